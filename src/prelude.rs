//! The cuvee prelude
//!
//! Re-exports the types needed by nearly every consumer of the core crate.

pub use crate::dataset::{Dataset, Float};
pub use crate::error::{Error, Result};
pub use crate::metrics::Regression;
pub use crate::param_guard::ParamGuard;
pub use crate::traits::{Fit, Predict};
