use crate::SessionMetrics;
use condition_selector::DifficultyTransition;
use session_core::SessionHistory;
use tracing::debug;
use trial_fsm::{SessionObserver, StateId, TrialRecord};

impl SessionObserver for SessionMetrics {
    fn on_state_entry(&mut self, state: StateId) {
        self.state_entries_total
            .with_label_values(&[state.as_str()])
            .inc();
    }

    fn on_trial_complete(&mut self, record: &TrialRecord, history: &SessionHistory) {
        if let Some(outcome) = record.outcome {
            self.trials_total
                .with_label_values(&[outcome.as_str()])
                .inc();
        }
        self.total_reward.set(history.total_reward());
        self.hydration_total.set(history.hydration_total());
        self.difficulty.set(i64::from(record.difficulty));
        self.trial_index.set(record.trial_idx as i64);
        self.punish_streak.set(history.punish_streak() as i64);
    }

    fn on_difficulty_change(&mut self, transition: &DifficultyTransition) {
        let direction = transition.step.as_str();
        debug!(direction, to = transition.to, "recording difficulty change");
        self.difficulty_changes_total
            .with_label_values(&[direction])
            .inc();
    }
}
