//! Rolling performance metrics for the staircase policy.
//!
//! Every metric returns `None` when it is undefined for the window (no valid
//! trials, or a degenerate label set for d′). The staircase treats `None` as
//! "no threshold crossed".

use session_core::{HistoryEntry, PerformanceMetric, SessionHistory};

/// Performance over the last `window` valid trials (rewarded or punished).
pub fn performance(
    history: &SessionHistory,
    window: usize,
    metric: PerformanceMetric,
) -> Option<f64> {
    let valid: Vec<HistoryEntry> = history.entries().filter(HistoryEntry::is_valid).collect();
    let tail = &valid[valid.len().saturating_sub(window)..];
    match metric {
        PerformanceMetric::Accuracy => accuracy(tail),
        PerformanceMetric::Dprime => dprime(tail),
    }
}

/// Fraction of trials with a positive reward.
pub fn accuracy(trials: &[HistoryEntry]) -> Option<f64> {
    if trials.is_empty() {
        return None;
    }
    let hits = trials
        .iter()
        .filter(|t| t.reward.map_or(false, |r| r > 0.0))
        .count();
    Some(hits as f64 / trials.len() as f64)
}

/// `sqrt(2) * Φ⁻¹(AUC)` of the subject's choices against the ports that
/// would have been correct.
///
/// A rewarded choice was correct; otherwise the other port of the binary
/// pair (`choice % 2 + 1`) was.
pub fn dprime(trials: &[HistoryEntry]) -> Option<f64> {
    let mut labels = Vec::with_capacity(trials.len());
    let mut scores = Vec::with_capacity(trials.len());
    for trial in trials {
        let choice = trial.choice?;
        let rewarded = trial.reward.map_or(false, |r| r > 0.0);
        labels.push(if rewarded { choice } else { choice % 2 + 1 });
        scores.push(choice as f64);
    }
    let auc = roc_auc(&labels, &scores)?;
    Some(std::f64::consts::SQRT_2 * probit(auc))
}

/// Area under the ROC curve for a binary label set, larger label positive.
///
/// Computed as the Mann-Whitney probability that a positive outscores a
/// negative, ties counting one half. `None` unless exactly two classes occur.
pub fn roc_auc(labels: &[u32], scores: &[f64]) -> Option<f64> {
    if labels.len() != scores.len() {
        return None;
    }
    let mut classes: Vec<u32> = labels.to_vec();
    classes.sort_unstable();
    classes.dedup();
    if classes.len() != 2 {
        return None;
    }
    let positive = classes[1];

    let pos: Vec<f64> = labels
        .iter()
        .zip(scores)
        .filter(|(l, _)| **l == positive)
        .map(|(_, s)| *s)
        .collect();
    let neg: Vec<f64> = labels
        .iter()
        .zip(scores)
        .filter(|(l, _)| **l != positive)
        .map(|(_, s)| *s)
        .collect();

    let mut wins = 0.0;
    for p in &pos {
        for n in &neg {
            if p > n {
                wins += 1.0;
            } else if p == n {
                wins += 0.5;
            }
        }
    }
    Some(wins / (pos.len() * neg.len()) as f64)
}

/// Inverse standard normal CDF (Acklam's rational approximation).
pub fn probit(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    const A: [f64; 6] = [
        -3.969683028665376e1,
        2.209460984245205e2,
        -2.759285104469687e2,
        1.383577518672690e2,
        -3.066479806614716e1,
        2.506628277459239e0,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e1,
        1.615858368580409e2,
        -1.556989798598866e2,
        6.680131188771972e1,
        -1.328068155288572e1,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-3,
        -3.223964580411365e-1,
        -2.400758277161838e0,
        -2.549732539343734e0,
        4.374664141464968e0,
        2.938163982698783e0,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-3,
        3.224671290700398e-1,
        2.445134137142996e0,
        3.754408661907416e0,
    ];
    const P_LOW: f64 = 0.02425;

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}
