use crate::antibias::anti_bias_target;
use crate::error::SelectError;
use crate::performance::performance;
use crate::policy::SelectionPolicy;
use crate::pool::ConditionPool;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use session_core::{Condition, SessionHistory};
use std::sync::Arc;
use tracing::{debug, info};

/// Which staircase threshold fired. Protocols may number their levels in
/// either order, so this is not derivable from the level values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StairStep {
    Up,
    Down,
}

impl StairStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            StairStep::Up => "up",
            StairStep::Down => "down",
        }
    }
}

/// A staircase move between difficulty levels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DifficultyTransition {
    pub from: i32,
    pub to: i32,
    pub step: StairStep,
    pub performance: f64,
}

/// The outcome of one successful selection.
#[derive(Debug, Clone)]
pub struct Draw {
    pub condition: Arc<Condition>,
    pub policy: SelectionPolicy,
    pub transition: Option<DifficultyTransition>,
}

/// Chooses the condition of each trial.
///
/// The policy is read from the condition being replaced, so a protocol can
/// switch policies by tagging its conditions. The session default only
/// applies to the first draw and to untagged conditions.
pub struct ConditionSelector {
    pool: ConditionPool,
    default_policy: String,
    rng: StdRng,
    block_order: Vec<usize>,
    cur_block: i32,
    cur_block_sz: usize,
    counted_trials: usize,
}

impl ConditionSelector {
    pub fn new(pool: ConditionPool, default_policy: impl Into<String>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let cur_block = pool.min_difficulty().unwrap_or(0);
        Self {
            pool,
            default_policy: default_policy.into(),
            rng,
            block_order: Vec::new(),
            cur_block,
            cur_block_sz: 0,
            counted_trials: 0,
        }
    }

    pub fn pool(&self) -> &ConditionPool {
        &self.pool
    }

    /// Difficulty the staircase is currently sampling from.
    pub fn current_difficulty(&self) -> i32 {
        self.cur_block
    }

    /// Valid trials counted since the last staircase decision.
    pub fn block_progress(&self) -> usize {
        self.cur_block_sz
    }

    /// Parse the policy that governs the draw after `current`.
    pub fn policy_for(&self, current: Option<&Condition>) -> Result<SelectionPolicy, SelectError> {
        current
            .and_then(|c| c.trial_selection())
            .unwrap_or(self.default_policy.as_str())
            .parse()
    }

    /// Select the next condition. `Ok(None)` means the pool is exhausted.
    pub fn select(
        &mut self,
        current: Option<&Condition>,
        history: &SessionHistory,
    ) -> Result<Option<Draw>, SelectError> {
        let policy = self.policy_for(current)?;
        if self.pool.is_empty() {
            return Ok(None);
        }

        let mut transition = None;
        let condition = match policy {
            SelectionPolicy::Fixed => self.select_fixed(),
            SelectionPolicy::Block => self.select_block(),
            SelectionPolicy::Random => self.select_random(),
            SelectionPolicy::Biased => self.select_biased(current, history)?,
            SelectionPolicy::Staircase => {
                let (condition, moved) = self.select_staircase(current, history)?;
                transition = moved;
                condition
            }
        };

        Ok(condition.map(|condition| {
            debug!(
                policy = %policy,
                hash = condition.hash(),
                difficulty = condition.difficulty(),
                "condition selected"
            );
            Draw {
                condition,
                policy,
                transition,
            }
        }))
    }

    fn select_fixed(&mut self) -> Option<Arc<Condition>> {
        // Indices shift after a pop.
        self.block_order.clear();
        self.pool.pop_front()
    }

    fn select_block(&mut self) -> Option<Arc<Condition>> {
        if self.block_order.is_empty() {
            self.block_order = (0..self.pool.len()).collect();
            self.block_order.shuffle(&mut self.rng);
        }
        let idx = self.block_order.pop()?;
        self.pool.get(idx).cloned()
    }

    fn select_random(&mut self) -> Option<Arc<Condition>> {
        let idx = self.rng.gen_range(0..self.pool.len());
        self.pool.get(idx).cloned()
    }

    fn select_biased(
        &mut self,
        current: Option<&Condition>,
        history: &SessionHistory,
    ) -> Result<Option<Arc<Condition>>, SelectError> {
        let bias_window = current.map_or(0, |c| c.params().bias_window);
        let all_choices = self.pool.unique_choices();
        let target = anti_bias_target(
            &history.choice_keys(),
            bias_window,
            &all_choices,
            &all_choices,
            &mut self.rng,
        )?;
        let Some(target) = target else {
            return Ok(None);
        };
        let matching = self.pool.indices_where(|c| c.choice_key() == target);
        Ok(self.pick(&matching))
    }

    fn select_staircase(
        &mut self,
        current: Option<&Condition>,
        history: &SessionHistory,
    ) -> Result<(Option<Arc<Condition>>, Option<DifficultyTransition>), SelectError> {
        let mut transition = None;

        if let Some(params) = current.map(|c| c.params()) {
            // 1. Count the newest trial once, and only if the subject answered.
            if history.len() > self.counted_trials {
                self.counted_trials = history.len();
                let answered = history
                    .last()
                    .and_then(|entry| entry.choice)
                    .map_or(false, |choice| choice > 0);
                if answered {
                    self.cur_block_sz += 1;
                }
            }

            // 2. Decide at the window boundary; the counter restarts either way.
            if params.staircase_window > 0 && self.cur_block_sz >= params.staircase_window {
                let perf = performance(history, params.staircase_window, params.metric);
                let from = self.cur_block;
                let step = match perf {
                    Some(p) if p >= params.stair_up => Some((StairStep::Up, params.next_up)),
                    Some(p) if p < params.stair_down => Some((StairStep::Down, params.next_down)),
                    _ => None,
                };
                self.cur_block_sz = 0;
                if let Some((step, to)) = step.filter(|(_, to)| *to != from) {
                    self.cur_block = to;
                    let performance = perf.unwrap_or(f64::NAN);
                    info!(from, to, step = step.as_str(), performance, "staircase difficulty changed");
                    transition = Some(DifficultyTransition {
                        from,
                        to,
                        step,
                        performance,
                    });
                }
            }
        }

        // 3. Draw within the current difficulty.
        let cur_block = self.cur_block;
        let antibias = current.map(|c| c.params()).filter(|p| p.antibias);
        let candidates = match antibias {
            Some(params) => {
                let in_block = self.pool.unique_choices_at(cur_block);
                let target = anti_bias_target(
                    &history.choice_keys(),
                    params.bias_window,
                    &self.pool.unique_choices(),
                    &in_block,
                    &mut self.rng,
                )?;
                match target {
                    Some(target) => self.pool.indices_where(|c| c.choice_key() == target),
                    None => Vec::new(),
                }
            }
            None => self.pool.indices_where(|c| c.difficulty() == cur_block),
        };

        match self.pick(&candidates) {
            Some(condition) => Ok((Some(condition), transition)),
            None => Err(SelectError::EmptyBlock(cur_block)),
        }
    }

    fn pick(&mut self, indices: &[usize]) -> Option<Arc<Condition>> {
        let idx = *indices.choose(&mut self.rng)?;
        self.pool.get(idx).cloned()
    }
}
