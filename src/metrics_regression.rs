//! Common metrics for regression
//!
//! This module implements comparison metrics for continuous variables, used
//! to score predictions against held-out targets.

use ndarray::{ArrayBase, ArrayView1, Data, Ix1};

use crate::dataset::Float;

/// Regression metrics trait
///
/// Implemented for one-dimensional arrays; the receiver holds the
/// predictions, `compare_to` the ground truth.
pub trait Regression<'a, A: 'a + Float> {
    /// Mean absolute error between two continuous variables
    fn mean_absolute_error<T: Into<ArrayView1<'a, A>>>(&self, compare_to: T) -> A;

    /// Mean squared error between two continuous variables
    fn mean_squared_error<T: Into<ArrayView1<'a, A>>>(&self, compare_to: T) -> A;

    /// Square root of the mean squared error
    fn root_mean_squared_error<T: Into<ArrayView1<'a, A>>>(&self, compare_to: T) -> A;

    /// Squared Pearson correlation between two continuous variables
    ///
    /// Returns `None` when the correlation is undefined, i.e. when either
    /// side has (numerically) zero variance or the result is not finite.
    /// When defined the value lies in the unit interval.
    fn r2<T: Into<ArrayView1<'a, A>>>(&self, compare_to: T) -> Option<A>;
}

impl<'a, A: 'a + Float, D: Data<Elem = A>> Regression<'a, A> for ArrayBase<D, Ix1> {
    fn mean_absolute_error<T: Into<ArrayView1<'a, A>>>(&self, compare_to: T) -> A {
        let compare_to = compare_to.into();

        (self - &compare_to).mapv(|x| x.abs()).mean().unwrap()
    }

    fn mean_squared_error<T: Into<ArrayView1<'a, A>>>(&self, compare_to: T) -> A {
        let compare_to = compare_to.into();

        (self - &compare_to).mapv(|x| x * x).mean().unwrap()
    }

    fn root_mean_squared_error<T: Into<ArrayView1<'a, A>>>(&self, compare_to: T) -> A {
        self.mean_squared_error(compare_to).sqrt()
    }

    fn r2<T: Into<ArrayView1<'a, A>>>(&self, compare_to: T) -> Option<A> {
        let compare_to = compare_to.into();

        if self.len() != compare_to.len() || self.len() < 2 {
            return None;
        }

        let mean_pred = self.mean()?;
        let mean_truth = compare_to.mean()?;

        let mut covariance = A::zero();
        let mut var_pred = A::zero();
        let mut var_truth = A::zero();
        for (&pred, &truth) in self.iter().zip(compare_to.iter()) {
            let dp = pred - mean_pred;
            let dt = truth - mean_truth;

            covariance += dp * dt;
            var_pred += dp * dp;
            var_truth += dt * dt;
        }

        // constant predictions or targets leave the correlation undefined
        if var_pred <= A::epsilon() || var_truth <= A::epsilon() {
            return None;
        }

        let r2 = covariance * covariance / (var_pred * var_truth);
        if !r2.is_finite() {
            return None;
        }

        // rounding can push a perfect correlation slightly past one
        Some(if r2 > A::one() { A::one() } else { r2 })
    }
}
