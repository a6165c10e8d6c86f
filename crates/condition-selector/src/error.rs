use rand::distributions::WeightedError;
use thiserror::Error;

/// Failures of the condition selector. Running out of conditions is not one
/// of them; `select` reports that as `Ok(None)`.
#[derive(Debug, Error)]
pub enum SelectError {
    #[error("unknown trial selection policy `{0}`")]
    UnknownPolicy(String),
    #[error("no conditions available at difficulty {0}")]
    EmptyBlock(i32),
    #[error("anti-bias weights rejected by sampler: {0}")]
    Weights(#[from] WeightedError),
}
