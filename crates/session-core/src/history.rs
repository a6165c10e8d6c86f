use crate::condition::ChoiceKey;
use serde::{Deserialize, Serialize};

/// One completed trial as appended to the history buffers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub choice: Option<u32>,
    pub reward: Option<f64>,
    pub punish: bool,
    pub difficulty: i32,
}

impl HistoryEntry {
    pub fn aborted(difficulty: i32) -> Self {
        Self {
            choice: None,
            reward: None,
            punish: false,
            difficulty,
        }
    }

    pub fn rewarded(choice: u32, amount: f64, difficulty: i32) -> Self {
        Self {
            choice: Some(choice),
            reward: Some(amount),
            punish: false,
            difficulty,
        }
    }

    pub fn punished(choice: u32, difficulty: i32) -> Self {
        Self {
            choice: Some(choice),
            reward: None,
            punish: true,
            difficulty,
        }
    }

    /// A trial the subject answered, whether rewarded or punished.
    pub fn is_valid(&self) -> bool {
        self.reward.is_some() || self.punish
    }
}

/// Per-session choice/reward/punish bookkeeping.
///
/// The four buffers are parallel: entry `i` of each describes completed
/// trial `i + 1`. They are only ever appended to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionHistory {
    choice_history: Vec<Option<u32>>,
    reward_history: Vec<Option<f64>>,
    punish_history: Vec<bool>,
    difficulty_history: Vec<i32>,
    total_reward: f64,
    free_reward: f64,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Negative reward amounts are stored as zero so the running total never
    /// decreases.
    pub fn append(&mut self, entry: HistoryEntry) {
        let reward = entry.reward.map(|amount| amount.max(0.0));
        self.choice_history.push(entry.choice);
        self.reward_history.push(reward);
        self.punish_history.push(entry.punish);
        self.difficulty_history.push(entry.difficulty);
        if let Some(amount) = reward {
            self.total_reward += amount;
        }
    }

    /// Reward handed out outside the trial structure (hydration).
    pub fn record_free_reward(&mut self, amount: f64) {
        self.free_reward += amount.max(0.0);
    }

    pub fn len(&self) -> usize {
        self.choice_history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choice_history.is_empty()
    }

    pub fn choices(&self) -> &[Option<u32>] {
        &self.choice_history
    }

    pub fn rewards(&self) -> &[Option<f64>] {
        &self.reward_history
    }

    pub fn punishes(&self) -> &[bool] {
        &self.punish_history
    }

    pub fn difficulties(&self) -> &[i32] {
        &self.difficulty_history
    }

    pub fn entry(&self, idx: usize) -> Option<HistoryEntry> {
        Some(HistoryEntry {
            choice: *self.choice_history.get(idx)?,
            reward: *self.reward_history.get(idx)?,
            punish: *self.punish_history.get(idx)?,
            difficulty: *self.difficulty_history.get(idx)?,
        })
    }

    pub fn last(&self) -> Option<HistoryEntry> {
        self.len().checked_sub(1).and_then(|idx| self.entry(idx))
    }

    pub fn entries(&self) -> impl Iterator<Item = HistoryEntry> + '_ {
        (0..self.len()).filter_map(move |idx| self.entry(idx))
    }

    /// Sum of trial rewards, ignoring missing entries.
    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    pub fn free_reward(&self) -> f64 {
        self.free_reward
    }

    /// Everything the subject drank this session, trial and free rewards.
    pub fn hydration_total(&self) -> f64 {
        self.total_reward + self.free_reward
    }

    pub fn is_hydrated(&self, threshold: f64) -> bool {
        self.hydration_total() >= threshold
    }

    /// Run-length of consecutive punished trials at the tail of the history.
    pub fn punish_streak(&self) -> usize {
        self.punish_history
            .iter()
            .rev()
            .take_while(|&&punished| punished)
            .count()
    }

    /// Choice key per completed trial, oldest first; `None` where the
    /// subject did not answer.
    pub fn choice_keys(&self) -> Vec<Option<ChoiceKey>> {
        self.choice_history
            .iter()
            .zip(&self.difficulty_history)
            .map(|(choice, &difficulty)| choice.map(|port| ChoiceKey::new(port, difficulty)))
            .collect()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// `nansum`: sum ignoring missing values.
pub fn nansum(values: &[Option<f64>]) -> f64 {
    values.iter().flatten().sum()
}

/// `nanmean`: mean ignoring missing values, `None` when nothing is present.
pub fn nanmean(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }
    Some(present.iter().sum::<f64>() / present.len() as f64)
}
