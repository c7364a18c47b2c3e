//! Provide traits for the different model steps
//!

use crate::dataset::{Dataset, Float};

/// Fit a model from a dataset
///
/// Implemented by (unchecked) hyper-parameter sets; fitting validates the
/// parameters first and forwards any error through the implementor's error
/// type.
pub trait Fit<F: Float> {
    type Object;
    type Error: std::error::Error;

    fn fit(&self, dataset: &Dataset<F>) -> Result<Self::Object, Self::Error>;
}

/// Predict targets for a set of feature rows
pub trait Predict<R, T> {
    fn predict(&self, records: R) -> T;
}
