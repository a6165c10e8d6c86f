use crate::adapters::{
    BehaviorAdapter, ControlAdapter, SessionEvent, SessionObserver, SetupInfo, SetupStatus,
    StimulusAdapter, TrialOutcome, TrialRecord,
};
use crate::control::ControlGate;
use crate::error::{AdapterKind, AdapterResultExt, SessionError};
use crate::states::StateId;
use condition_selector::ConditionSelector;
use session_core::{Condition, HistoryEntry, SessionHistory, SessionParams, Timer, WallClock};
use std::sync::Arc;
use tracing::{info, warn};

/// Everything the trial states share for the lifetime of a session.
pub struct SessionContext {
    pub(crate) params: SessionParams,
    pub(crate) behavior: Box<dyn BehaviorAdapter>,
    pub(crate) stimulus: Box<dyn StimulusAdapter>,
    pub(crate) control: Box<dyn ControlAdapter>,
    pub(crate) observers: Vec<Box<dyn SessionObserver>>,
    pub(crate) clock: Box<dyn WallClock>,
    pub(crate) selector: ConditionSelector,
    pub(crate) history: SessionHistory,
    pub(crate) gate: ControlGate,
    /// Restarted on every state entry.
    pub(crate) timer: Timer,
    pub(crate) condition: Option<Arc<Condition>>,
    pub(crate) record: TrialRecord,
    pub(crate) trial_idx: u64,
    /// Reference timestamp for the current state's readiness and response checks.
    pub(crate) since_ms: u64,
    pub(crate) ready: bool,
    pub(crate) responded: bool,
    pub(crate) delivered: bool,
    pub(crate) punish_period_ms: u64,
    pub(crate) exhausted: bool,
}

impl SessionContext {
    pub(crate) fn new(
        params: SessionParams,
        behavior: Box<dyn BehaviorAdapter>,
        stimulus: Box<dyn StimulusAdapter>,
        control: Box<dyn ControlAdapter>,
        clock: Box<dyn WallClock>,
        selector: ConditionSelector,
    ) -> Self {
        let gate = ControlGate::new(params.status_poll_ms, params.idle_poll_ms);
        Self {
            params,
            behavior,
            stimulus,
            control,
            observers: Vec::new(),
            clock,
            selector,
            history: SessionHistory::new(),
            gate,
            timer: Timer::new(),
            condition: None,
            record: TrialRecord::default(),
            trial_idx: 0,
            since_ms: 0,
            ready: false,
            responded: false,
            delivered: false,
            punish_period_ms: 0,
            exhausted: false,
        }
    }

    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn selector(&self) -> &ConditionSelector {
        &self.selector
    }

    pub fn gate(&self) -> &ControlGate {
        &self.gate
    }

    pub fn current_condition(&self) -> Option<&Condition> {
        self.condition.as_deref()
    }

    pub fn trial_idx(&self) -> u64 {
        self.trial_idx
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub(crate) fn condition(&self) -> Result<Arc<Condition>, SessionError> {
        self.condition.clone().ok_or(SessionError::NoActiveCondition)
    }

    pub fn is_sleep_time(&self) -> bool {
        self.params
            .active_hours
            .map_or(false, |hours| hours.is_sleep_time(self.clock.as_ref()))
    }

    pub fn is_hydrated(&self, threshold: f64) -> bool {
        self.history.is_hydrated(threshold)
    }

    pub(crate) fn log(&mut self, event: SessionEvent) -> Result<u64, SessionError> {
        self.control
            .log(&event)
            .adapter(AdapterKind::Control, "log")
    }

    pub(crate) fn log_state_onset(&mut self, state: StateId) -> Result<u64, SessionError> {
        let trial_idx = self.trial_idx;
        self.log(SessionEvent::StateOnset { state, trial_idx })
    }

    pub(crate) fn ping(&mut self) -> Result<(), SessionError> {
        self.control.ping().adapter(AdapterKind::Control, "ping")
    }

    pub(crate) fn poll_gate(&mut self, idle: bool) -> Result<SetupStatus, SessionError> {
        self.gate.poll(self.control.as_mut(), idle)
    }

    pub(crate) fn set_status(&mut self, status: SetupStatus) -> Result<(), SessionError> {
        self.gate.set_status(self.control.as_mut(), status)
    }

    pub(crate) fn quit(&mut self) -> Result<(), SessionError> {
        self.gate.quit(self.control.as_mut())
    }

    pub(crate) fn update_setup_info(&mut self, info: &SetupInfo) -> Result<(), SessionError> {
        self.control
            .update_setup_info(info)
            .adapter(AdapterKind::Control, "update_setup_info")
    }

    /// Close the current trial: one history entry, one trial log.
    pub(crate) fn complete_trial(
        &mut self,
        outcome: TrialOutcome,
        reward: Option<f64>,
    ) -> Result<(), SessionError> {
        let choice = match outcome {
            TrialOutcome::Abort => None,
            TrialOutcome::Reward | TrialOutcome::Punish => self.record.response.map(|r| r.port),
        };
        let entry = HistoryEntry {
            choice,
            reward,
            punish: outcome == TrialOutcome::Punish,
            difficulty: self.record.difficulty,
        };
        self.history.append(entry);
        self.behavior
            .update_history(&entry)
            .adapter(AdapterKind::Behavior, "update_history")?;

        self.record.outcome = Some(outcome);
        self.record.reward = reward;
        self.control
            .log_trial(&self.record)
            .adapter(AdapterKind::Control, "log_trial")?;
        self.log(SessionEvent::Outcome {
            trial_idx: self.record.trial_idx,
            outcome,
            reward,
        })?;

        info!(
            trial = self.record.trial_idx,
            outcome = outcome.as_str(),
            difficulty = self.record.difficulty,
            total_reward = self.history.total_reward(),
            "trial complete"
        );
        for observer in self.observers.iter_mut() {
            observer.on_trial_complete(&self.record, &self.history);
        }
        Ok(())
    }

    /// Best-effort teardown after a fatal error. Failures are logged, not
    /// returned, so the first error reaches the caller.
    pub(crate) fn abort_cleanup(&mut self) {
        if let Err(err) = self.set_status(SetupStatus::Exit) {
            warn!(error = %err, "could not push exit status");
        }
        if let Err(err) = self.behavior.exit() {
            warn!(error = %err, "behavior cleanup failed");
        }
        if let Err(err) = self.stimulus.exit() {
            warn!(error = %err, "stimulus cleanup failed");
        }
    }
}
