use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackerError>;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("tracking store I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize tracking record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no runs recorded for experiment {0}")]
    NoRuns(String),
    #[error("run {0} does not exist")]
    RunNotFound(String),
    #[error("no loadable model at {0}")]
    ModelNotFound(PathBuf),
    #[error("artifact path {0} has no file name")]
    InvalidArtifact(PathBuf),
}
