//! Reload a registered model and score new rows

use ndarray::{Array1, Array2};
use tracing::info;

use cuvee::traits::Predict;
use cuvee_elasticnet::ElasticNet;

use crate::error::{PipelineError, Result};

/// Load the model registered at `model_uri` and predict the given rows
///
/// `model_uri` is the winning run's artifact location joined with the model
/// name. The feature rows must have exactly the number of columns the model
/// was trained on; the target column is not part of the input. Returns one
/// prediction per row, in row order.
pub fn predict_with_model(model_uri: &str, records: &Array2<f64>) -> Result<Array1<f64>> {
    let model: ElasticNet<f64> = cuvee_tracking::load_model(model_uri)?;

    if records.ncols() != model.nfeatures() {
        return Err(PipelineError::FeatureMismatch {
            uri: model_uri.to_string(),
            expected: model.nfeatures(),
            found: records.ncols(),
        });
    }

    info!(model_uri, rows = records.nrows(), "scoring rows");

    Ok(model.predict(records))
}
