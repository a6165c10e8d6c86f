use crate::error::SelectError;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use session_core::ChoiceKey;

/// `1 - mean(window == candidate)` per candidate, falling back to uniform
/// weights when every candidate scores zero. Unanswered entries never match
/// but still count toward the mean.
pub fn anti_bias_weights(window: &[Option<ChoiceKey>], candidates: &[ChoiceKey]) -> Vec<f64> {
    let weights: Vec<f64> = candidates
        .iter()
        .map(|candidate| {
            if window.is_empty() {
                return 1.0;
            }
            let hits = window.iter().filter(|key| **key == Some(*candidate)).count();
            1.0 - hits as f64 / window.len() as f64
        })
        .collect();

    if weights.iter().sum::<f64>() <= 0.0 {
        return vec![1.0; candidates.len()];
    }
    weights
}

/// Draw the response target the subject should see next.
///
/// `recent` holds one entry per completed trial, oldest first, with `None`
/// for trials without an answer. When the history is shorter than
/// `bias_window` the whole unique choice set stands in for the window.
pub fn anti_bias_target<R: Rng + ?Sized>(
    recent: &[Option<ChoiceKey>],
    bias_window: usize,
    all_choices: &[ChoiceKey],
    candidates: &[ChoiceKey],
    rng: &mut R,
) -> Result<Option<ChoiceKey>, SelectError> {
    if candidates.is_empty() {
        return Ok(None);
    }
    let weights = if bias_window > 0 && recent.len() >= bias_window {
        anti_bias_weights(&recent[recent.len() - bias_window..], candidates)
    } else {
        let fallback: Vec<Option<ChoiceKey>> = all_choices.iter().copied().map(Some).collect();
        anti_bias_weights(&fallback, candidates)
    };
    let sampler = WeightedIndex::new(&weights)?;
    Ok(Some(candidates[sampler.sample(rng)]))
}
