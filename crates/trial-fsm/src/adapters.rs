//! Contracts between the trial state machine and the rig.
//!
//! Every adapter call returns `anyhow::Result`; the machine wraps a failure
//! once with the adapter kind and operation and never retries it.

use crate::states::StateId;
use anyhow::Result;
use condition_selector::{DifficultyTransition, StairStep};
use serde::{Deserialize, Serialize};
use session_core::{Condition, HistoryEntry, SessionHistory};
use std::fmt;

/// A response observed by the behavior adapter.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Response {
    pub port: u32,
    pub time_ms: u64,
}

/// Which part of the trial a stimulus is being prepared for.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Trial,
    Cue,
    Delay,
    Response,
}

/// Remote control status of the setup.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SetupStatus {
    #[default]
    Ready,
    Running,
    Stop,
    Sleeping,
    Exit,
    Offtime,
    Wakeup,
}

impl SetupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetupStatus::Ready => "ready",
            SetupStatus::Running => "running",
            SetupStatus::Stop => "stop",
            SetupStatus::Sleeping => "sleeping",
            SetupStatus::Exit => "exit",
            SetupStatus::Offtime => "offtime",
            SetupStatus::Wakeup => "wakeup",
        }
    }

    /// `stop` and `exit` end the session from any state.
    pub fn is_stop(&self) -> bool {
        matches!(self, SetupStatus::Stop | SetupStatus::Exit)
    }
}

impl fmt::Display for SetupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial update of the setup record; `None` fields are left untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SetupInfo {
    pub status: Option<SetupStatus>,
    pub difficulty: Option<i32>,
    pub trial_idx: Option<u64>,
    pub total_reward: Option<f64>,
}

impl SetupInfo {
    pub fn status(status: SetupStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn difficulty(difficulty: i32) -> Self {
        Self {
            difficulty: Some(difficulty),
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrialOutcome {
    Abort,
    Reward,
    Punish,
}

impl TrialOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrialOutcome::Abort => "abort",
            TrialOutcome::Reward => "reward",
            TrialOutcome::Punish => "punish",
        }
    }
}

/// Per-trial record handed to `ControlAdapter::log_trial`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TrialRecord {
    pub trial_idx: u64,
    pub condition_hash: String,
    pub difficulty: i32,
    pub start_ms: u64,
    pub response: Option<Response>,
    /// The response arrived after the readiness requirement was met.
    pub in_window: bool,
    pub outcome: Option<TrialOutcome>,
    pub reward: Option<f64>,
}

impl TrialRecord {
    pub fn new(trial_idx: u64, condition: &Condition, start_ms: u64) -> Self {
        Self {
            trial_idx,
            condition_hash: condition.hash().to_string(),
            difficulty: condition.difficulty(),
            start_ms,
            ..Self::default()
        }
    }
}

/// Events written through `ControlAdapter::log`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    StateOnset {
        state: StateId,
        trial_idx: u64,
    },
    TrialOnset {
        trial_idx: u64,
        condition_hash: String,
        difficulty: i32,
    },
    Outcome {
        trial_idx: u64,
        outcome: TrialOutcome,
        reward: Option<f64>,
    },
    Punishment {
        trial_idx: u64,
        streak: usize,
        period_ms: u64,
    },
    FreeReward {
        amount: f64,
        hydration_total: f64,
    },
    DifficultyChange {
        from: i32,
        to: i32,
        step: StairStep,
        performance: f64,
    },
    SessionEnd {
        trials: usize,
        total_reward: f64,
        exhausted: bool,
    },
}

/// Sensing and actuation: lick ports, touch screens, valves.
pub trait BehaviorAdapter {
    fn setup(&mut self) -> Result<()> {
        Ok(())
    }

    fn prepare(&mut self, condition: &Condition) -> Result<()>;

    /// The subject has held still (or held the init port) for at least
    /// `min_duration_ms` since `since_ms`.
    fn is_ready(&mut self, min_duration_ms: u64, since_ms: u64) -> Result<bool>;

    /// A response was registered after `since_ms`.
    fn get_response(&mut self, since_ms: u64) -> Result<bool>;

    /// The most recent response, if any.
    fn response(&self) -> Option<Response>;

    /// The last response matched the prepared condition.
    fn is_correct(&self) -> bool;

    /// Deliver `amount`; `false` means delivery is still pending.
    fn reward(&mut self, amount: f64) -> Result<bool>;

    fn punish(&mut self) -> Result<()>;

    fn update_history(&mut self, _entry: &HistoryEntry) -> Result<()> {
        Ok(())
    }

    fn exit(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Stimulus presentation. Only `prepare`, `start` and `stop` are mandatory.
pub trait StimulusAdapter {
    fn setup(&mut self) -> Result<()> {
        Ok(())
    }

    fn prepare(&mut self, condition: &Condition, period: Period) -> Result<()>;

    fn start(&mut self) -> Result<()>;

    fn present(&mut self) -> Result<()> {
        Ok(())
    }

    fn stop(&mut self) -> Result<()>;

    fn ready_stim(&mut self) -> Result<()> {
        Ok(())
    }

    fn reward_stim(&mut self) -> Result<()> {
        Ok(())
    }

    fn punish_stim(&mut self) -> Result<()> {
        Ok(())
    }

    fn exit(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Logging and remote control of the setup.
pub trait ControlAdapter {
    /// Record an event and return its timestamp in session milliseconds.
    fn log(&mut self, event: &SessionEvent) -> Result<u64>;

    fn update_setup_info(&mut self, info: &SetupInfo) -> Result<()>;

    fn setup_status(&mut self) -> Result<SetupStatus>;

    /// Liveness heartbeat.
    fn ping(&mut self) -> Result<()> {
        Ok(())
    }

    /// Open trial `trial_idx` and return its start timestamp.
    fn init_trial(&mut self, trial_idx: u64, condition_hash: &str) -> Result<u64>;

    fn log_trial(&mut self, record: &TrialRecord) -> Result<()>;
}

/// Passive hooks for metrics and monitoring.
pub trait SessionObserver {
    fn on_state_entry(&mut self, _state: StateId) {}

    fn on_trial_complete(&mut self, _record: &TrialRecord, _history: &SessionHistory) {}

    fn on_difficulty_change(&mut self, _transition: &DifficultyTransition) {}
}
