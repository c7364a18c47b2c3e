//! Cross-validated penalty selection
//!
//! Mirrors the `cv.glmnet` procedure: a geometric path of penalty candidates
//! is evaluated with k-fold cross-validation, the per-lambda validation
//! errors are aggregated into a mean curve with standard errors, and the
//! final model is refitted on the full training data at the largest penalty
//! whose mean error stays within one standard error of the minimum.

use ndarray::{Array1, Axis};

use cuvee::metrics::Regression;
use cuvee::traits::{Fit, Predict};
use cuvee::{Dataset, Float, ParamGuard};

use crate::error::ElasticNetError;
use crate::hyperparams::ElasticNetParams;
use crate::{ElasticNet, Result};

/// A verified hyper-parameter set for cross-validated penalty selection
///
/// See [`CvElasticNetParams`](crate::CvElasticNetParams) for more
/// information.
#[derive(Clone, Debug, PartialEq)]
pub struct CvElasticNetValidParams<F> {
    l1_ratio: F,
    nfolds: usize,
    n_lambdas: usize,
    lambda_min_ratio: F,
    with_intercept: bool,
    max_iterations: u32,
    tolerance: F,
}

impl<F: Float> CvElasticNetValidParams<F> {
    pub fn l1_ratio(&self) -> F {
        self.l1_ratio
    }

    pub fn nfolds(&self) -> usize {
        self.nfolds
    }

    pub fn n_lambdas(&self) -> usize {
        self.n_lambdas
    }

    pub fn lambda_min_ratio(&self) -> F {
        self.lambda_min_ratio
    }

    pub fn with_intercept(&self) -> bool {
        self.with_intercept
    }
}

/// A hyper-parameter set for cross-validated elastic net fitting
///
/// The penalty is not chosen by the caller; instead a geometric grid of
/// [`n_lambdas`](Self::n_lambdas) candidates is derived from the data,
/// starting at the smallest penalty that zeroes every coefficient and
/// decaying to [`lambda_min_ratio`](Self::lambda_min_ratio) times that
/// value. Every candidate is scored on [`nfolds`](Self::nfolds)
/// cross-validation folds with the mean squared error.
///
/// # Parameters
/// | Name | Default | Purpose | Range |
/// | :--- | :--- | :---| :--- |
/// | [l1_ratio](Self::l1_ratio) | `0.5` | Distribution of penalty to L1 and L2 regularizations | `[0.0, 1.0]` |
/// | [nfolds](Self::nfolds) | `5` | Number of cross-validation folds | `[2, nsamples]` |
/// | [n_lambdas](Self::n_lambdas) | `100` | Number of penalty candidates | `[2, inf)` |
/// | [lambda_min_ratio](Self::lambda_min_ratio) | `1e-2` | Smallest candidate relative to the largest | `(0, 1)` |
/// | [with_intercept](Self::with_intercept) | `true` | Enable intercept | `false`, `true` |
#[derive(Clone, Debug, PartialEq)]
pub struct CvElasticNetParams<F>(CvElasticNetValidParams<F>);

impl<F: Float> Default for CvElasticNetParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> CvElasticNetParams<F> {
    /// Create default cross-validation hyper parameters
    pub fn new() -> Self {
        Self(CvElasticNetValidParams {
            l1_ratio: F::cast(0.5),
            nfolds: 5,
            n_lambdas: 100,
            lambda_min_ratio: F::cast(1e-2),
            with_intercept: true,
            max_iterations: 1000,
            tolerance: F::cast(1e-4),
        })
    }

    /// Set the l1 ratio shared by every candidate fit.
    ///
    /// Defaults to `0.5` if not set
    pub fn l1_ratio(mut self, l1_ratio: F) -> Self {
        self.0.l1_ratio = l1_ratio;
        self
    }

    /// Set the number of cross-validation folds.
    ///
    /// Defaults to `5` if not set
    pub fn nfolds(mut self, nfolds: usize) -> Self {
        self.0.nfolds = nfolds;
        self
    }

    /// Set the number of penalty candidates on the path.
    ///
    /// Defaults to `100` if not set
    pub fn n_lambdas(mut self, n_lambdas: usize) -> Self {
        self.0.n_lambdas = n_lambdas;
        self
    }

    /// Set the ratio between the smallest and the largest candidate penalty.
    ///
    /// Defaults to `1e-2` if not set
    pub fn lambda_min_ratio(mut self, ratio: F) -> Self {
        self.0.lambda_min_ratio = ratio;
        self
    }

    /// Configure the candidate models to fit an intercept.
    /// Defaults to `true` if not set.
    pub fn with_intercept(mut self, with_intercept: bool) -> Self {
        self.0.with_intercept = with_intercept;
        self
    }

    /// Set the maximum number of coordinate descent iterations per fit.
    ///
    /// Defaults to `1000` if not set
    pub fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.0.max_iterations = max_iterations;
        self
    }

    /// Set the coordinate descent stopping tolerance.
    ///
    /// Defaults to `1e-4` if not set
    pub fn tolerance(mut self, tolerance: F) -> Self {
        self.0.tolerance = tolerance;
        self
    }
}

impl<F: Float> ParamGuard for CvElasticNetParams<F> {
    type Checked = CvElasticNetValidParams<F>;
    type Error = ElasticNetError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if !(F::zero()..=F::one()).contains(&self.0.l1_ratio) {
            Err(ElasticNetError::InvalidL1Ratio(
                self.0.l1_ratio.to_f32().unwrap(),
            ))
        } else if self.0.nfolds < 2 {
            Err(ElasticNetError::InvalidNFolds(self.0.nfolds))
        } else if self.0.n_lambdas < 2 {
            Err(ElasticNetError::InvalidLambdaCount(self.0.n_lambdas))
        } else if !(self.0.lambda_min_ratio > F::zero() && self.0.lambda_min_ratio < F::one()) {
            Err(ElasticNetError::InvalidLambdaRatio(
                self.0.lambda_min_ratio.to_f32().unwrap(),
            ))
        } else if self.0.tolerance.is_negative() {
            Err(ElasticNetError::InvalidTolerance(
                self.0.tolerance.to_f32().unwrap(),
            ))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

/// The cross-validation curve of a fitted [`CvElasticNet`]
///
/// One entry per penalty candidate, ordered from the largest penalty to the
/// smallest, plus the two selected penalties.
#[derive(Clone, Debug, PartialEq)]
pub struct CvCurve<F> {
    lambdas: Vec<F>,
    mean_mse: Vec<F>,
    std_error: Vec<F>,
    lambda_min: F,
    lambda_1se: F,
}

impl<F: Float> CvCurve<F> {
    /// The evaluated penalty candidates, largest first
    pub fn lambdas(&self) -> &[F] {
        &self.lambdas
    }

    /// Mean validation error per candidate; non-finite entries mark
    /// candidates whose fit did not converge on some fold
    pub fn mean_mse(&self) -> &[F] {
        &self.mean_mse
    }

    /// Standard error of the validation error per candidate
    pub fn std_error(&self) -> &[F] {
        &self.std_error
    }

    /// The penalty minimizing the mean validation error
    pub fn lambda_min(&self) -> F {
        self.lambda_min
    }

    /// The largest penalty within one standard error of the minimum
    pub fn lambda_1se(&self) -> F {
        self.lambda_1se
    }
}

/// Elastic net model with a cross-validated penalty
///
/// Holds the model refitted on the full training data at
/// [`lambda_1se`](CvCurve::lambda_1se) together with the validation curve
/// that led to the choice.
#[derive(Clone, Debug, PartialEq)]
pub struct CvElasticNet<F> {
    model: ElasticNet<F>,
    curve: CvCurve<F>,
}

impl<F: Float> CvElasticNet<F> {
    /// Create a default parameter set for cross-validated fitting
    pub fn params() -> CvElasticNetParams<F> {
        CvElasticNetParams::new()
    }

    /// The model refitted at the selected penalty
    pub fn model(&self) -> &ElasticNet<F> {
        &self.model
    }

    /// The cross-validation curve behind the selection
    pub fn curve(&self) -> &CvCurve<F> {
        &self.curve
    }

    /// Consume the pair and keep only the fitted model
    pub fn into_model(self) -> ElasticNet<F> {
        self.model
    }
}

impl<F: Float> Fit<F> for CvElasticNetParams<F> {
    type Object = CvElasticNet<F>;
    type Error = ElasticNetError;

    fn fit(&self, dataset: &Dataset<F>) -> Result<CvElasticNet<F>> {
        self.check_ref()?.fit(dataset)
    }
}

impl<F: Float> CvElasticNetValidParams<F> {
    /// Run the full cross-validation and refit at the selected penalty
    pub fn fit(&self, dataset: &Dataset<F>) -> Result<CvElasticNet<F>> {
        if dataset.nsamples() < self.nfolds {
            return Err(ElasticNetError::NotEnoughSamples);
        }

        let lambdas = self.lambda_path(dataset)?;
        let folds = dataset.fold(self.nfolds)?;

        // per-fold validation error for every lambda candidate
        let mut fold_mse = vec![Vec::with_capacity(lambdas.len()); folds.len()];
        for ((train, valid), row) in folds.iter().zip(fold_mse.iter_mut()) {
            for &lambda in &lambdas {
                let mse = match self.base_params(lambda).fit(train) {
                    Ok(model) => {
                        let prediction: Array1<F> = model.predict(valid.records());
                        prediction.mean_squared_error(valid.targets())
                    }
                    // a candidate that fails to converge on one fold is
                    // excluded from selection, not fatal to the whole search
                    Err(ElasticNetError::NotConverged(_)) => F::infinity(),
                    Err(err) => return Err(err),
                };
                row.push(mse);
            }
        }

        let k = F::cast(folds.len());
        let mut mean_mse = Vec::with_capacity(lambdas.len());
        let mut std_error = Vec::with_capacity(lambdas.len());
        for li in 0..lambdas.len() {
            let mean = fold_mse.iter().map(|row| row[li]).sum::<F>() / k;
            let variance = fold_mse
                .iter()
                .map(|row| (row[li] - mean) * (row[li] - mean))
                .sum::<F>()
                / (k - F::one());
            mean_mse.push(mean);
            std_error.push((variance / k).sqrt());
        }

        let min_index = mean_mse
            .iter()
            .enumerate()
            .filter(|(_, mse)| mse.is_finite())
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(index, _)| index)
            .ok_or(ElasticNetError::IllConditioned)?;

        // the path is ordered from large to small, so the first candidate
        // within one standard error of the minimum is the largest one
        let threshold = mean_mse[min_index] + std_error[min_index];
        let one_se_index = mean_mse
            .iter()
            .position(|&mse| mse.is_finite() && mse <= threshold)
            .unwrap_or(min_index);

        let curve = CvCurve {
            lambdas: lambdas.clone(),
            mean_mse,
            std_error,
            lambda_min: lambdas[min_index],
            lambda_1se: lambdas[one_se_index],
        };

        let model = self.base_params(curve.lambda_1se).fit(dataset)?;

        Ok(CvElasticNet { model, curve })
    }

    /// Geometric penalty path from the data-derived maximum down to
    /// `lambda_min_ratio` times that value
    fn lambda_path(&self, dataset: &Dataset<F>) -> Result<Vec<F>> {
        let n = F::cast(dataset.nsamples());
        let y_mean = dataset.targets().mean().unwrap_or_else(F::zero);
        let centered = &dataset.targets() - y_mean;

        // below an all-ridge mix the usual lambda_max formula degenerates
        let mixing = F::max(self.l1_ratio, F::cast(1e-3));
        let mut lambda_max = F::zero();
        for column in dataset.records().axis_iter(Axis(1)) {
            lambda_max = F::max(lambda_max, column.dot(&centered).abs());
        }
        lambda_max = lambda_max / (n * mixing);

        if !lambda_max.is_finite() || lambda_max <= F::zero() {
            return Err(ElasticNetError::IllConditioned);
        }

        let last = F::cast(self.n_lambdas - 1);
        let path = (0..self.n_lambdas)
            .map(|i| lambda_max * self.lambda_min_ratio.powf(F::cast(i) / last))
            .collect();

        Ok(path)
    }

    fn base_params(&self, lambda: F) -> ElasticNetParams<F> {
        ElasticNet::params()
            .penalty(lambda)
            .l1_ratio(self.l1_ratio)
            .with_intercept(self.with_intercept)
            .max_iterations(self.max_iterations)
            .tolerance(self.tolerance)
    }
}
