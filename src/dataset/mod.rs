//! Datasets
//!
//! This module implements the dataset struct used throughout the workspace:
//! a dense feature matrix with named columns and a single continuous target
//! per row.

use ndarray::{Array1, Array2, NdFloat};
use num_traits::{FromPrimitive, NumAssignOps, NumCast, Signed};
use rand::distributions::uniform::SampleUniform;
use std::iter::Sum;

mod impl_dataset;

/// Floating point numbers
///
/// This trait bound multiplexes the common assumptions about floating point
/// numbers and implements them for 32bit and 64bit floating points. They are
/// used for the records as well as the targets of a dataset.
pub trait Float:
    NdFloat
    + FromPrimitive
    + Signed
    + Default
    + Sum
    + NumAssignOps
    + SampleUniform
    + approx::AbsDiffEq<Epsilon = Self>
{
    fn cast<T: NumCast>(x: T) -> Self {
        NumCast::from(x).unwrap()
    }
}

impl Float for f32 {}
impl Float for f64 {}

/// A table of numeric feature columns plus one numeric target column
///
/// Row order carries no meaning and rows are not required to be unique. The
/// feature names default to `feature-0`, `feature-1`, .. and can be replaced
/// with [`with_feature_names`](Dataset::with_feature_names).
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<F> {
    pub(crate) records: Array2<F>,
    pub(crate) targets: Array1<F>,
    pub(crate) feature_names: Vec<String>,
}
