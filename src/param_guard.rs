//! Verification of hyper-parameters
//!

/// A set of hyper-parameters whose values have not been checked for validity.
///
/// A reference to the checked parameters can only be obtained after the
/// checking has completed. Algorithms implement their fitting entry points on
/// the unchecked set and call [`check_ref`](ParamGuard::check_ref) first, so
/// an invalid parameter combination surfaces as an error of the algorithm
/// crate instead of a panic.
pub trait ParamGuard {
    /// The checked hyper-parameters
    type Checked;
    /// Error raised for invalid hyper-parameters
    type Error: std::error::Error;

    /// Check the hyper-parameters and return a reference to the checked set
    fn check_ref(&self) -> Result<&Self::Checked, Self::Error>;

    /// Check the hyper-parameters and consume the unchecked set
    fn check(self) -> Result<Self::Checked, Self::Error>;

    /// Call `check()` and panic on invalid parameters
    fn check_unwrap(self) -> Self::Checked
    where
        Self: Sized,
    {
        self.check().unwrap()
    }
}
