use condition_selector::SelectError;
use session_core::ConfigError;
use std::fmt;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdapterKind {
    Behavior,
    Stimulus,
    Control,
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdapterKind::Behavior => "behavior",
            AdapterKind::Stimulus => "stimulus",
            AdapterKind::Control => "control",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session has no conditions")]
    NoConditions,
    #[error("no condition is active in this trial")]
    NoActiveCondition,
    #[error(transparent)]
    Select(#[from] SelectError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{kind} adapter failed in `{operation}`: {source}")]
    Adapter {
        kind: AdapterKind,
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

/// Attach adapter context to an `anyhow` result.
pub trait AdapterResultExt<T> {
    fn adapter(self, kind: AdapterKind, operation: &'static str) -> Result<T, SessionError>;
}

impl<T> AdapterResultExt<T> for anyhow::Result<T> {
    fn adapter(self, kind: AdapterKind, operation: &'static str) -> Result<T, SessionError> {
        self.map_err(|err| SessionError::Adapter {
            kind,
            operation,
            source: err.into(),
        })
    }
}
