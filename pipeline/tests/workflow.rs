//! End-to-end coverage of the train/track/select/predict workflow on the
//! bundled wine-quality sample.

use ndarray::s;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tempfile::TempDir;

use cuvee_pipeline::{execute_run, predict_with_model, select_best_run, RunSpec};
use cuvee_tracking::{ExperimentStore, RunStatus};

const MODEL_NAME: &str = "wine-model";

#[test]
fn full_workflow_on_the_sample_dataset() {
    let dir = TempDir::new().unwrap();
    let store = ExperimentStore::open(dir.path()).unwrap();
    let experiment = store.experiment("wine-quality").unwrap();
    let data = cuvee_datasets::winequality_sample();

    let specs = [
        RunSpec::new(0.5, 0.5, MODEL_NAME),
        RunSpec::new(0.2, 0.2, MODEL_NAME),
        RunSpec::new(0.1, 0.1, MODEL_NAME),
    ];

    let mut outcomes = Vec::new();
    for (index, spec) in specs.iter().enumerate() {
        let mut rng = SmallRng::seed_from_u64(42 + index as u64);
        let outcome = execute_run(&store, &experiment, &data, spec, &mut rng).unwrap();

        assert!(outcome.rmse >= 0.0);
        assert!(outcome.mae >= 0.0);
        if let Some(r2) = outcome.r2 {
            assert!((0.0..=1.0).contains(&r2));
        }
        assert!(outcome.lambda_1se > 0.0);

        outcomes.push(outcome);
    }

    // every run was recorded with its parameters and closed cleanly
    let runs = store
        .search_runs(experiment.experiment_id(), "r2")
        .unwrap();
    assert_eq!(runs.len(), 3);
    for run in &runs {
        assert_eq!(run.info().status(), RunStatus::Finished);
        assert!(run.param("alpha").is_some());
        assert!(run.param("lambda").is_some());
        assert!(run.param("lambda_1se").is_some());
        assert!(run.metric("rmse").is_some());
        assert!(run.metric("mae").is_some());
    }

    // the winner is the run with the highest recorded r2
    let best = select_best_run(&store, experiment.experiment_id()).unwrap();
    let top_r2 = outcomes
        .iter()
        .filter_map(|outcome| outcome.r2)
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(best.r2, top_r2);

    // the registered model reloads and yields one finite prediction per row
    let model_uri = format!("{}/{}", best.artifact_uri, MODEL_NAME);
    let rows = data.records().slice(s![..5, ..]).to_owned();
    let predictions = predict_with_model(&model_uri, &rows).unwrap();

    assert_eq!(predictions.len(), 5);
    assert!(predictions.iter().all(|prediction| prediction.is_finite()));
}

#[test]
fn identical_seeds_reproduce_identical_metrics() {
    let dir = TempDir::new().unwrap();
    let store = ExperimentStore::open(dir.path()).unwrap();
    let experiment = store.experiment("determinism").unwrap();
    let data = cuvee_datasets::winequality_sample();
    let spec = RunSpec::new(0.5, 0.5, MODEL_NAME);

    let first = {
        let mut rng = SmallRng::seed_from_u64(7);
        execute_run(&store, &experiment, &data, &spec, &mut rng).unwrap()
    };
    let second = {
        let mut rng = SmallRng::seed_from_u64(7);
        execute_run(&store, &experiment, &data, &spec, &mut rng).unwrap()
    };

    assert_ne!(first.run_id, second.run_id);
    assert_eq!(first.rmse, second.rmse);
    assert_eq!(first.mae, second.mae);
    assert_eq!(first.r2, second.r2);
    assert_eq!(first.lambda_1se, second.lambda_1se);
}

#[test]
fn cv_plot_is_uploaded_per_run() {
    let dir = TempDir::new().unwrap();
    let store = ExperimentStore::open(dir.path()).unwrap();
    let experiment = store.experiment("artifacts").unwrap();
    let data = cuvee_datasets::winequality_sample();

    let mut rng = SmallRng::seed_from_u64(3);
    let outcome = execute_run(
        &store,
        &experiment,
        &data,
        &RunSpec::new(0.2, 0.2, MODEL_NAME),
        &mut rng,
    )
    .unwrap();

    let run = store
        .get_run(experiment.experiment_id(), &outcome.run_id)
        .unwrap();
    let plot = std::path::Path::new(run.info().artifact_uri())
        .join(format!("cv-curve-{}.png", outcome.run_id));

    assert!(plot.is_file());
    let bytes = std::fs::read(&plot).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
}
