//! `cuvee` provides the shared building blocks of the wine-quality
//! experiment workflow: an in-memory dataset with named features, random
//! train/test splitting and k-folding, regression metrics, and the
//! `Fit`/`Predict`/`ParamGuard` seams the algorithm crates implement.
//!
//! The crates in this workspace build on top of it:
//!
//! * [`cuvee-elasticnet`](../cuvee_elasticnet/index.html) fits the
//!   regularized regression models,
//! * [`cuvee-datasets`](../cuvee_datasets/index.html) loads the wine-quality
//!   tables,
//! * [`cuvee-tracking`](../cuvee_tracking/index.html) records runs, metrics
//!   and artifacts,
//! * [`cuvee-pipeline`](../cuvee_pipeline/index.html) ties everything into
//!   the train/evaluate/select/predict workflow.

pub mod dataset;
pub mod error;
mod metrics_regression;
pub mod param_guard;
pub mod prelude;
pub mod traits;

pub use dataset::{Dataset, Float};
pub use error::{Error, Result};
pub use param_guard::ParamGuard;

/// Common metric functions for regression
pub mod metrics {
    pub use crate::metrics_regression::Regression;
}
