//! One tracked train/evaluate/log cycle

use std::path::PathBuf;

use ndarray::Array1;
use rand::Rng;
use tracing::{info, warn};

use cuvee::metrics::Regression;
use cuvee::traits::{Fit, Predict};
use cuvee::Dataset;
use cuvee_elasticnet::CvElasticNet;
use cuvee_tracking::{ActiveRun, Experiment, ExperimentStore};

use crate::error::{PipelineError, Result};
use crate::plot;

/// Fraction of rows used for training in every run
pub const TRAIN_RATIO: f32 = 0.75;

/// One hyper-parameter configuration to train and track
#[derive(Debug, Clone, PartialEq)]
pub struct RunSpec {
    /// The elastic net mixing parameter (glmnet `alpha`)
    pub l1_ratio: f64,
    /// The requested penalty (glmnet `lambda`); logged with the run, while
    /// the predictor uses the cross-validated penalty instead
    pub penalty: f64,
    /// Name the fitted predictor is registered under
    pub model_name: String,
}

impl RunSpec {
    pub fn new(l1_ratio: f64, penalty: f64, model_name: impl Into<String>) -> Self {
        Self {
            l1_ratio,
            penalty,
            model_name: model_name.into(),
        }
    }
}

/// The outcome of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedRun {
    pub run_id: String,
    pub rmse: f64,
    pub mae: f64,
    /// `None` when the squared correlation was undefined on the test split
    pub r2: Option<f64>,
    /// The cross-validated penalty the registered predictor uses
    pub lambda_1se: f64,
}

/// Perform one tracked train/evaluate/log cycle
///
/// The dataset is shuffled with the caller's random generator and split
/// 75/25 into train and test rows. An elastic net with the spec's mixing
/// parameter is fitted on the training partition with a cross-validated
/// one-standard-error penalty, scored on the test partition, and everything
/// is recorded under a fresh run scope: the requested parameters, the
/// penalty actually used, the RMSE/MAE/R² metrics, the cross-validation
/// plot, and the fitted predictor under `spec.model_name`.
///
/// The run scope is closed even when a step fails; whatever was logged
/// before the failure is kept.
pub fn execute_run<R: Rng>(
    store: &ExperimentStore,
    experiment: &Experiment,
    data: &Dataset<f64>,
    spec: &RunSpec,
    rng: &mut R,
) -> Result<ExecutedRun> {
    let (train, test) = data.shuffle(rng).split_with_ratio(TRAIN_RATIO);
    if train.nsamples() == 0 || test.nsamples() == 0 {
        return Err(PipelineError::EmptyPartition {
            train: train.nsamples(),
            test: test.nsamples(),
        });
    }

    let (run_id, outcome) = store.with_run(experiment, |run| {
        run.log_param("alpha", spec.l1_ratio)?;
        run.log_param("lambda", spec.penalty)?;

        let fitted = CvElasticNet::params().l1_ratio(spec.l1_ratio).fit(&train)?;
        let lambda_1se = fitted.curve().lambda_1se();
        run.log_param("lambda_1se", lambda_1se)?;

        let prediction: Array1<f64> = fitted.model().predict(test.records());
        let rmse = prediction.root_mean_squared_error(test.targets());
        let mae = prediction.mean_absolute_error(test.targets());
        let r2 = prediction.r2(test.targets());

        run.log_metric("rmse", rmse)?;
        run.log_metric("mae", mae)?;
        match r2 {
            Some(r2) => run.log_metric("r2", r2)?,
            None => warn!(run_id = run.run_id(), "r2 undefined on the test split"),
        }

        upload_cv_plot(run, &fitted)?;
        run.register_model(&spec.model_name, fitted.model())?;

        Ok::<_, PipelineError>(ExecutedRun {
            run_id: run.run_id().to_string(),
            rmse,
            mae,
            r2,
            lambda_1se,
        })
    })?;

    info!(
        %run_id,
        alpha = spec.l1_ratio,
        lambda = spec.penalty,
        rmse = outcome.rmse,
        mae = outcome.mae,
        "run completed"
    );

    Ok(outcome)
}

/// Render the cross-validation curve into a per-run scratch file and upload
/// it as an artifact of the run
fn upload_cv_plot(run: &mut ActiveRun, fitted: &CvElasticNet<f64>) -> Result<PathBuf> {
    let scratch = std::env::temp_dir().join(format!("cv-curve-{}.png", run.run_id()));

    plot::cv_curve(fitted.curve(), &scratch)?;
    let stored = run.log_artifact(&scratch)?;
    let _ = std::fs::remove_file(&scratch);

    Ok(stored)
}
