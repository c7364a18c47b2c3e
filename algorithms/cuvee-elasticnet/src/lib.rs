//! # Elastic net regression
//!
//! `cuvee-elasticnet` fits linear regression models with a penalty term
//! blending L1 and L2 regularization, controlled by a mixing parameter
//! (`l1_ratio`, the glmnet `alpha`) and a penalty strength (`penalty`, the
//! glmnet `lambda`).
//!
//! Two entry points are provided:
//!
//! * [`ElasticNet`] fits a single model for a fixed penalty,
//! * [`CvElasticNet`] selects the penalty by k-fold cross-validation over a
//!   geometric lambda path and keeps the model refitted at the
//!   one-standard-error choice, along with the full validation curve for
//!   diagnostics.

use cuvee::Float;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

mod algorithm;
mod cross_validation;
mod error;
mod hyperparams;

pub use cross_validation::{CvCurve, CvElasticNet, CvElasticNetParams, CvElasticNetValidParams};
pub use error::{ElasticNetError, Result};
pub use hyperparams::{ElasticNetParams, ElasticNetValidParams};

/// Elastic net model
///
/// This struct contains the parameters of a fitted elastic net model: the
/// separating hyperplane, (optionally) an intercept, the duality gap and the
/// number of steps needed in the computation.
///
/// ## Model implementation
///
/// The coordinate descent algorithm is used to solve the lasso and ridge
/// problem. It optimizes each parameter separately, holding all the others
/// fixed. This cycles as long as the coefficients have not stabilized or the
/// maximum number of iterations is reached.
///
/// See also:
/// * [Talk on Fast Regularization Paths](https://web.stanford.edu/~hastie/TALKS/glmnet.pdf)
/// * [Regularization Paths for Generalized Linear Models via Coordinate
///   Descent](http://www.jstatsoft.org/v33/i01/paper)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElasticNet<F> {
    hyperplane: Array1<F>,
    intercept: F,
    duality_gap: F,
    n_steps: u32,
}

impl<F: Float> ElasticNet<F> {
    /// Create a default parameter set for construction of an ElasticNet model
    ///
    /// By default, an intercept will be fitted. To disable fitting an
    /// intercept, call `.with_intercept(false)` before calling `.fit()`.
    pub fn params() -> ElasticNetParams<F> {
        ElasticNetParams::new()
    }

    /// Create a ridge only model
    pub fn ridge() -> ElasticNetParams<F> {
        ElasticNetParams::new().l1_ratio(F::zero())
    }

    /// Create a LASSO only model
    pub fn lasso() -> ElasticNetParams<F> {
        ElasticNetParams::new().l1_ratio(F::one())
    }
}
