use std::path::PathBuf;

use thiserror::Error;

/// Failures raised at the edges of the engine. The comparison functions
/// themselves never fail; they degrade to empty results instead.
#[derive(Debug, Error)]
pub enum CompareError {
    #[error("no scenarios to compare")]
    NoScenarios,
    #[error("base scenario `{0}` was not found")]
    ScenarioNotFound(String),
    #[error("unknown metric `{0}`")]
    UnknownMetric(String),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("could not read `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse `{path}`: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl CompareError {
    /// True when the caller supplied bad input, as opposed to an environment failure.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, CompareError::Io { .. })
    }
}
