use thiserror::Error;

use cuvee_datasets::DatasetsError;
use cuvee_elasticnet::ElasticNetError;
use cuvee_tracking::TrackerError;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Everything that can abort a workflow step
///
/// Data, fitting and tracking failures are forwarded from the crates that
/// raise them; the remaining variants are the workflow's own.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Data(#[from] DatasetsError),
    #[error(transparent)]
    Fit(#[from] ElasticNetError),
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error("train/test split left an empty partition ({train} train / {test} test rows)")]
    EmptyPartition { train: usize, test: usize },
    #[error("model at {uri} expects {expected} features, but rows have {found}")]
    FeatureMismatch {
        uri: String,
        expected: usize,
        found: usize,
    },
    #[error("no run has logged the metric `{0}`")]
    NoScoredRuns(String),
    #[error("failed to render diagnostic plot: {0}")]
    Plot(String),
}
