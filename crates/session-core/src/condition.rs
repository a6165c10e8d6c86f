use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Performance metric driving the staircase policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceMetric {
    #[default]
    Accuracy,
    Dprime,
}

/// Declarative parameters of one trial variant.
///
/// Durations are milliseconds. Keys the core does not know about land in
/// `stimulus` and are handed to the stimulus adapter untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConditionParams {
    pub trial_selection: Option<String>,
    pub difficulty: i32,
    pub response_port: u32,
    pub reward_amount: f64,

    pub init_ready: u64,
    pub trial_ready: u64,
    pub trial_duration: u64,
    pub intertrial_duration: u64,
    pub reward_duration: u64,
    pub punish_duration: u64,
    pub abort_duration: u64,
    pub cue_duration: u64,
    pub cue_ready: u64,
    pub delay_duration: u64,
    pub delay_ready: u64,

    pub noresponse_intertrial: bool,
    pub incremental_punishment: bool,

    pub staircase_window: usize,
    pub stair_up: f64,
    pub stair_down: f64,
    pub next_up: i32,
    pub next_down: i32,
    pub metric: PerformanceMetric,
    pub antibias: bool,
    pub bias_window: usize,

    #[serde(flatten)]
    pub stimulus: BTreeMap<String, serde_json::Value>,
}

impl Default for ConditionParams {
    fn default() -> Self {
        Self {
            trial_selection: None,
            difficulty: 0,
            response_port: 1,
            reward_amount: 5.0,
            init_ready: 0,
            trial_ready: 0,
            trial_duration: 1000,
            intertrial_duration: 1000,
            reward_duration: 2000,
            punish_duration: 1000,
            abort_duration: 0,
            cue_duration: 0,
            cue_ready: 0,
            delay_duration: 0,
            delay_ready: 0,
            noresponse_intertrial: false,
            incremental_punishment: false,
            staircase_window: 20,
            stair_up: 0.7,
            stair_down: 0.55,
            next_up: 0,
            next_down: 0,
            metric: PerformanceMetric::Accuracy,
            antibias: false,
            bias_window: 5,
            stimulus: BTreeMap::new(),
        }
    }
}

/// Response target bucketed by difficulty; the unit of anti-bias sampling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChoiceKey {
    pub response_port: u32,
    pub difficulty: i32,
}

impl ChoiceKey {
    pub fn new(response_port: u32, difficulty: i32) -> Self {
        Self {
            response_port,
            difficulty,
        }
    }

    /// Stable hex digest, for logs and persisted records.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.response_port.to_le_bytes());
        hasher.update(self.difficulty.to_le_bytes());
        hex::encode(&hasher.finalize()[..8])
    }
}

impl fmt::Display for ChoiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "port{}@d{}", self.response_port, self.difficulty)
    }
}

/// An immutable trial condition with its derived identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "ConditionParams", into = "ConditionParams")]
pub struct Condition {
    params: ConditionParams,
    hash: String,
    choice: ChoiceKey,
}

impl Condition {
    pub fn new(params: ConditionParams) -> Result<Self, ConfigError> {
        let encoded = serde_json::to_vec(&params)?;
        let hash = hex::encode(Sha256::digest(&encoded));
        let choice = ChoiceKey::new(params.response_port, params.difficulty);
        Ok(Self {
            params,
            hash,
            choice,
        })
    }

    pub fn params(&self) -> &ConditionParams {
        &self.params
    }

    /// SHA-256 hex digest of the canonical JSON encoding of the params.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn difficulty(&self) -> i32 {
        self.params.difficulty
    }

    pub fn choice_key(&self) -> ChoiceKey {
        self.choice
    }

    pub fn trial_selection(&self) -> Option<&str> {
        self.params.trial_selection.as_deref()
    }
}

impl TryFrom<ConditionParams> for Condition {
    type Error = ConfigError;

    fn try_from(params: ConditionParams) -> Result<Self, Self::Error> {
        Condition::new(params)
    }
}

impl From<Condition> for ConditionParams {
    fn from(condition: Condition) -> Self {
        condition.params
    }
}

/// Read a JSON array of condition parameter maps.
pub fn load_conditions(path: &Path) -> Result<Vec<Condition>, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let conditions: Vec<Condition> = serde_json::from_str(&contents)?;
    Ok(conditions)
}
