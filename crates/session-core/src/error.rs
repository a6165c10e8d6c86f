use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating session configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid session parameter `{field}`: {reason}")]
    InvalidParam { field: &'static str, reason: String },
}
