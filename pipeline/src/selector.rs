//! Selection of the best run by goodness of fit

use tracing::info;

use cuvee_tracking::ExperimentStore;

use crate::error::{PipelineError, Result};

/// The metric runs are compared on
pub const SELECTION_METRIC: &str = "r2";

/// The winning run of a selection pass
#[derive(Debug, Clone, PartialEq)]
pub struct BestRun {
    pub run_id: String,
    pub artifact_uri: String,
    pub r2: f64,
}

/// Query all runs of the experiment and pick the one with the highest R²
///
/// Selection is recomputed from the store on every call; nothing is cached.
/// Fails when the experiment has no runs at all, or when no run ever logged
/// the selection metric.
pub fn select_best_run(store: &ExperimentStore, experiment_id: &str) -> Result<BestRun> {
    let runs = store.search_runs(experiment_id, SELECTION_METRIC)?;

    // runs are ordered descending with metric-less runs last, so the top
    // run either carries the metric or nobody does
    let top = runs.into_iter().next().expect("search_runs is non-empty");
    let r2 = top
        .metric(SELECTION_METRIC)
        .ok_or_else(|| PipelineError::NoScoredRuns(SELECTION_METRIC.to_string()))?;

    info!(run_id = top.info().run_id(), r2, "selected best run");

    Ok(BestRun {
        run_id: top.info().run_id().to_string(),
        artifact_uri: top.info().artifact_uri().to_string(),
        r2,
    })
}
