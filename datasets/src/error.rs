use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatasetsError>;

#[derive(Debug, Error)]
pub enum DatasetsError {
    #[error("failed to fetch dataset: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed delimited table: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed numeric table: {0}")]
    Parse(#[from] ndarray_csv::ReadError),
    #[error("invalid table shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("table at {path} lacks the target column `{column}`")]
    MissingTargetColumn { path: String, column: String },
    #[error("tables disagree on their schema: {left:?} vs {right:?}")]
    SchemaMismatch {
        left: Vec<String>,
        right: Vec<String>,
    },
}
