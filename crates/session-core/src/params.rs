use crate::active_hours::ActiveHours;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Phase layout of a trial.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Paradigm {
    /// Respond at the correct port while the stimulus is up.
    #[default]
    MatchPort,
    /// Cue, then delay, then a response phase.
    MatchToSample,
}

/// Session-wide settings, normally loaded from the protocol's JSON file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionParams {
    pub setup: String,
    pub paradigm: Paradigm,
    /// Policy for the first draw, and for conditions that carry no tag.
    pub trial_selection: String,
    pub active_hours: Option<ActiveHours>,
    /// Hydration floor: below it the subject gets free rewards at night.
    pub min_reward: f64,
    /// Daily cap: once reached the session idles in offtime.
    pub max_reward: f64,
    /// Free reward per response in hydrate; the condition's amount when unset.
    pub hydrate_reward_amount: Option<f64>,
    pub status_poll_ms: u64,
    pub idle_poll_ms: u64,
    pub hydrate_pause_ms: u64,
    pub offtime_pause_ms: u64,
    /// Resume on our own when active hours return instead of waiting for a
    /// remote `wakeup`.
    pub auto_wake: bool,
    pub seed: Option<u64>,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            setup: "rig-0".into(),
            paradigm: Paradigm::MatchPort,
            trial_selection: "fixed".into(),
            active_hours: None,
            min_reward: 500.0,
            max_reward: 3000.0,
            hydrate_reward_amount: None,
            status_poll_ms: 5000,
            idle_poll_ms: 1000,
            hydrate_pause_ms: 1000,
            offtime_pause_ms: 1000,
            auto_wake: false,
            seed: None,
        }
    }
}

impl SessionParams {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let params: SessionParams = serde_json::from_str(&contents)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.status_poll_ms == 0 {
            return Err(ConfigError::InvalidParam {
                field: "status_poll_ms",
                reason: "must be positive".into(),
            });
        }
        if self.idle_poll_ms == 0 {
            return Err(ConfigError::InvalidParam {
                field: "idle_poll_ms",
                reason: "must be positive".into(),
            });
        }
        if self.min_reward < 0.0 || self.max_reward < 0.0 {
            return Err(ConfigError::InvalidParam {
                field: "min_reward",
                reason: "reward thresholds cannot be negative".into(),
            });
        }
        if self.min_reward > self.max_reward {
            return Err(ConfigError::InvalidParam {
                field: "min_reward",
                reason: format!(
                    "hydration floor {} exceeds daily cap {}",
                    self.min_reward, self.max_reward
                ),
            });
        }
        if self.trial_selection.trim().is_empty() {
            return Err(ConfigError::InvalidParam {
                field: "trial_selection",
                reason: "empty policy tag".into(),
            });
        }
        Ok(())
    }
}
