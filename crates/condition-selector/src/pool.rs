use session_core::{ChoiceKey, Condition};
use std::collections::BTreeSet;
use std::sync::Arc;

/// The session's conditions in insertion order.
///
/// Read-only after setup except for `pop_front`, which the `fixed` policy
/// uses to consume entries.
#[derive(Debug, Clone, Default)]
pub struct ConditionPool {
    entries: Vec<Arc<Condition>>,
}

impl ConditionPool {
    pub fn new(conditions: Vec<Condition>) -> Self {
        Self {
            entries: conditions.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Arc<Condition>> {
        self.entries.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Condition>> {
        self.entries.iter()
    }

    pub fn pop_front(&mut self) -> Option<Arc<Condition>> {
        if self.entries.is_empty() {
            return None;
        }
        Some(self.entries.remove(0))
    }

    pub fn difficulties(&self) -> Vec<i32> {
        self.entries.iter().map(|c| c.difficulty()).collect()
    }

    pub fn min_difficulty(&self) -> Option<i32> {
        self.entries.iter().map(|c| c.difficulty()).min()
    }

    pub fn choice_keys(&self) -> Vec<ChoiceKey> {
        self.entries.iter().map(|c| c.choice_key()).collect()
    }

    /// Distinct choice keys across every difficulty, sorted.
    pub fn unique_choices(&self) -> Vec<ChoiceKey> {
        let set: BTreeSet<ChoiceKey> = self.entries.iter().map(|c| c.choice_key()).collect();
        set.into_iter().collect()
    }

    pub fn unique_choices_at(&self, difficulty: i32) -> Vec<ChoiceKey> {
        let set: BTreeSet<ChoiceKey> = self
            .entries
            .iter()
            .filter(|c| c.difficulty() == difficulty)
            .map(|c| c.choice_key())
            .collect();
        set.into_iter().collect()
    }

    pub fn indices_where<F>(&self, mut pred: F) -> Vec<usize>
    where
        F: FnMut(&Condition) -> bool,
    {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, c)| pred(c))
            .map(|(idx, _)| idx)
            .collect()
    }
}
