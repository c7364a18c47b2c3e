use thiserror::Error;

/// Simplified `Result` using [`ElasticNetError`](crate::ElasticNetError) as
/// error type
pub type Result<T> = std::result::Result<T, ElasticNetError>;

#[derive(Debug, Clone, Error)]
pub enum ElasticNetError {
    /// The penalty must not be negative
    #[error("penalty must not be negative, but is {0}")]
    InvalidPenalty(f32),
    /// The L1 ratio mixes the penalties and lives in the unit interval
    #[error("l1 ratio should be in range [0, 1], but is {0}")]
    InvalidL1Ratio(f32),
    #[error("tolerance must not be negative, but is {0}")]
    InvalidTolerance(f32),
    #[error("number of folds should be at least 2, but is {0}")]
    InvalidNFolds(usize),
    #[error("lambda path needs at least 2 candidates, but has {0}")]
    InvalidLambdaCount(usize),
    #[error("lambda path ratio should be in range (0, 1), but is {0}")]
    InvalidLambdaRatio(f32),
    /// The input has not enough samples
    #[error("not enough samples to fit the requested model")]
    NotEnoughSamples,
    /// The input is singular
    #[error("the data is ill-conditioned")]
    IllConditioned,
    #[error("coordinate descent did not converge within {0} steps")]
    NotConverged(u32),
    #[error(transparent)]
    BaseCrate(#[from] cuvee::Error),
}
