//! Experiment store - the filesystem-backed tracking backend

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Result, TrackerError};
use crate::experiment::Experiment;
use crate::record::{MetricRecord, Param};
use crate::run::{Run, RunInfo, RunStatus};

const EXPERIMENT_FILE: &str = "experiment.json";
const RUN_FILE: &str = "run.json";
const ARTIFACT_DIR: &str = "artifacts";
const MODEL_FILE: &str = "model.json";

/// Filesystem-backed store for experiments, runs and artifacts
///
/// The store is append-only from the caller's perspective: runs are created
/// through [`start_run`](ExperimentStore::start_run), written on every
/// logging call and never mutated after they were closed.
#[derive(Debug, Clone)]
pub struct ExperimentStore {
    root: PathBuf,
}

impl ExperimentStore {
    /// Open a store rooted at the given directory, creating it if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;

        Ok(Self { root })
    }

    /// The root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the experiment with the given name, creating it on first use
    pub fn experiment(&self, name: &str) -> Result<Experiment> {
        for entry in fs::read_dir(&self.root)? {
            let meta_file = entry?.path().join(EXPERIMENT_FILE);
            if !meta_file.is_file() {
                continue;
            }

            let experiment: Experiment = serde_json::from_slice(&fs::read(&meta_file)?)?;
            if experiment.name() == name {
                return Ok(experiment);
            }
        }

        let experiment_id = Uuid::new_v4().simple().to_string();
        let location = self.root.join(&experiment_id);
        fs::create_dir_all(&location)?;

        let experiment = Experiment::new(&experiment_id, name, location.display().to_string());
        fs::write(
            location.join(EXPERIMENT_FILE),
            serde_json::to_string_pretty(&experiment)?,
        )?;

        info!(%experiment_id, name, "created experiment");

        Ok(experiment)
    }

    /// Open a new tracked run scope under the given experiment
    pub fn start_run(&self, experiment: &Experiment) -> Result<ActiveRun> {
        let run_id = Uuid::new_v4().simple().to_string();
        let run_dir = self.root.join(experiment.experiment_id()).join(&run_id);
        let artifact_dir = run_dir.join(ARTIFACT_DIR);
        fs::create_dir_all(&artifact_dir)?;

        let info = RunInfo::new(
            &run_id,
            experiment.experiment_id(),
            artifact_dir.display().to_string(),
        );

        let active = ActiveRun {
            run: Run::new(info),
            run_dir,
        };
        active.flush()?;

        info!(%run_id, experiment = experiment.name(), "started run");

        Ok(active)
    }

    /// Run `f` inside a tracked run scope with guaranteed closure
    ///
    /// The run is marked `Finished` when `f` returns `Ok` and `Failed` when
    /// it returns `Err`; either way the run record on disk is closed, and
    /// everything logged before a failure is kept.
    pub fn with_run<T, E>(
        &self,
        experiment: &Experiment,
        f: impl FnOnce(&mut ActiveRun) -> std::result::Result<T, E>,
    ) -> std::result::Result<(String, T), E>
    where
        E: From<TrackerError>,
    {
        let mut run = self.start_run(experiment)?;

        match f(&mut run) {
            Ok(value) => {
                let run_id = run.finish()?;
                Ok((run_id, value))
            }
            Err(err) => {
                // the original error outranks any failure to close the scope
                let _ = run.fail();
                Err(err)
            }
        }
    }

    /// Load a single run of an experiment
    pub fn get_run(&self, experiment_id: &str, run_id: &str) -> Result<Run> {
        let run_file = self
            .root
            .join(experiment_id)
            .join(run_id)
            .join(RUN_FILE);
        let bytes =
            fs::read(&run_file).map_err(|_| TrackerError::RunNotFound(run_id.to_string()))?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Query all runs of an experiment, ordered by a metric
    ///
    /// Runs are sorted descending by the latest value of `order_by_metric`;
    /// runs that never logged the metric sort last. Ties are broken by run
    /// ID, the ordering the store assigns. Fails with
    /// [`NoRuns`](TrackerError::NoRuns) when the experiment has no runs.
    pub fn search_runs(&self, experiment_id: &str, order_by_metric: &str) -> Result<Vec<Run>> {
        let experiment_dir = self.root.join(experiment_id);
        let mut runs = Vec::new();

        for entry in fs::read_dir(&experiment_dir)? {
            let run_file = entry?.path().join(RUN_FILE);
            if !run_file.is_file() {
                continue;
            }

            runs.push(serde_json::from_slice::<Run>(&fs::read(&run_file)?)?);
        }

        if runs.is_empty() {
            return Err(TrackerError::NoRuns(experiment_id.to_string()));
        }

        runs.sort_by(|a, b| {
            match (a.metric(order_by_metric), b.metric(order_by_metric)) {
                (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
            .then_with(|| a.info().run_id().cmp(b.info().run_id()))
        });

        debug!(
            experiment_id,
            metric = order_by_metric,
            count = runs.len(),
            "searched runs"
        );

        Ok(runs)
    }
}

/// An open run scope
///
/// Logging calls append to the run record and flush it to disk immediately.
/// The scope is closed with [`finish`](ActiveRun::finish) or
/// [`fail`](ActiveRun::fail); prefer
/// [`ExperimentStore::with_run`](ExperimentStore::with_run), which closes
/// the scope on every path.
#[derive(Debug)]
pub struct ActiveRun {
    run: Run,
    run_dir: PathBuf,
}

impl ActiveRun {
    /// The ID the store assigned to this run
    pub fn run_id(&self) -> &str {
        self.run.info().run_id()
    }

    /// The directory artifacts of this run are uploaded to
    pub fn artifact_uri(&self) -> &str {
        self.run.info().artifact_uri()
    }

    /// Log a named parameter
    ///
    /// The value is stored verbatim; querying the run returns exactly the
    /// logged string.
    pub fn log_param(&mut self, key: &str, value: impl ToString) -> Result<()> {
        self.run
            .data_mut()
            .push_param(Param::new(key, value.to_string()));
        self.flush()
    }

    /// Log a named metric value
    pub fn log_metric(&mut self, key: &str, value: f64) -> Result<()> {
        self.run
            .data_mut()
            .push_metric(MetricRecord::new(key, value));
        self.flush()
    }

    /// Upload a local file as an artifact of this run
    ///
    /// The file is copied into the run's artifact directory under its own
    /// file name; the returned path points at the stored copy.
    pub fn log_artifact(&mut self, path: &Path) -> Result<PathBuf> {
        let file_name = path
            .file_name()
            .ok_or_else(|| TrackerError::InvalidArtifact(path.to_path_buf()))?;

        let destination = self.run_dir.join(ARTIFACT_DIR).join(file_name);
        fs::copy(path, &destination)?;

        debug!(run_id = self.run_id(), artifact = %destination.display(), "uploaded artifact");

        Ok(destination)
    }

    /// Register a serializable model under a name and return its URI
    ///
    /// The model is serialized to `<artifact_uri>/<name>/model.json` and can
    /// be reloaded with [`load_model`] given the returned URI.
    pub fn register_model<M: Serialize>(&mut self, name: &str, model: &M) -> Result<String> {
        let model_dir = self.run_dir.join(ARTIFACT_DIR).join(name);
        fs::create_dir_all(&model_dir)?;
        fs::write(
            model_dir.join(MODEL_FILE),
            serde_json::to_string_pretty(model)?,
        )?;

        info!(run_id = self.run_id(), model = name, "registered model");

        Ok(format!("{}/{}", self.artifact_uri(), name))
    }

    /// Close the run scope as successfully finished
    pub fn finish(mut self) -> Result<String> {
        self.close(RunStatus::Finished)
    }

    /// Close the run scope as failed, keeping everything logged so far
    pub fn fail(mut self) -> Result<String> {
        self.close(RunStatus::Failed)
    }

    fn close(&mut self, status: RunStatus) -> Result<String> {
        self.run.info_mut().close(status);
        self.flush()?;

        info!(run_id = self.run_id(), ?status, "closed run");

        Ok(self.run_id().to_string())
    }

    fn flush(&self) -> Result<()> {
        fs::write(
            self.run_dir.join(RUN_FILE),
            serde_json::to_string_pretty(&self.run)?,
        )?;

        Ok(())
    }
}

/// Load a registered model from its URI
///
/// The URI is the value returned by
/// [`register_model`](ActiveRun::register_model), i.e. the run's artifact
/// location joined with the model name.
pub fn load_model<M: DeserializeOwned>(model_uri: impl AsRef<Path>) -> Result<M> {
    let path = model_uri.as_ref().join(MODEL_FILE);
    let bytes = fs::read(&path).map_err(|_| TrackerError::ModelNotFound(path.clone()))?;

    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    fn store() -> (TempDir, ExperimentStore) {
        let dir = TempDir::new().unwrap();
        let store = ExperimentStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn experiment_is_created_once() {
        let (_dir, store) = store();

        let first = store.experiment("wine-quality").unwrap();
        let second = store.experiment("wine-quality").unwrap();

        assert_eq!(first, second);

        let other = store.experiment("another").unwrap();
        assert_ne!(first.experiment_id(), other.experiment_id());
    }

    #[test]
    fn param_roundtrip_is_exact() {
        let (_dir, store) = store();
        let experiment = store.experiment("roundtrip").unwrap();

        let mut run = store.start_run(&experiment).unwrap();
        run.log_param("alpha", 0.5).unwrap();
        run.log_param("lambda", 0.2).unwrap();
        let run_id = run.finish().unwrap();

        let loaded = store.get_run(experiment.experiment_id(), &run_id).unwrap();
        assert_eq!(loaded.param("alpha"), Some("0.5"));
        assert_eq!(loaded.param("lambda"), Some("0.2"));
        assert_eq!(loaded.param("gamma"), None);
    }

    #[test]
    fn search_runs_orders_by_metric() {
        let (_dir, store) = store();
        let experiment = store.experiment("ordering").unwrap();

        for r2 in [0.41, 0.77, 0.63] {
            let mut run = store.start_run(&experiment).unwrap();
            run.log_metric("r2", r2).unwrap();
            run.finish().unwrap();
        }

        let runs = store.search_runs(experiment.experiment_id(), "r2").unwrap();
        let ordered = runs
            .iter()
            .map(|run| run.metric("r2").unwrap())
            .collect::<Vec<_>>();

        assert_eq!(ordered, vec![0.77, 0.63, 0.41]);
    }

    #[test]
    fn runs_without_the_metric_sort_last() {
        let (_dir, store) = store();
        let experiment = store.experiment("partial").unwrap();

        let mut scored = store.start_run(&experiment).unwrap();
        scored.log_metric("r2", 0.5).unwrap();
        scored.finish().unwrap();

        let unscored = store.start_run(&experiment).unwrap();
        unscored.finish().unwrap();

        let runs = store.search_runs(experiment.experiment_id(), "r2").unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].metric("r2"), Some(0.5));
        assert_eq!(runs[1].metric("r2"), None);
    }

    #[test]
    fn empty_experiment_has_no_runs() {
        let (_dir, store) = store();
        let experiment = store.experiment("empty").unwrap();

        let result = store.search_runs(experiment.experiment_id(), "r2");
        assert!(matches!(result, Err(TrackerError::NoRuns(_))));
    }

    #[test]
    fn with_run_closes_scope_on_error() {
        let (_dir, store) = store();
        let experiment = store.experiment("boundary").unwrap();

        let mut seen_run_id = String::new();
        let result: std::result::Result<(String, ()), TrackerError> =
            store.with_run(&experiment, |run| {
                seen_run_id = run.run_id().to_string();
                run.log_metric("rmse", 1.0)?;
                Err(TrackerError::NoRuns("injected".into()))
            });

        assert!(result.is_err());

        let run = store
            .get_run(experiment.experiment_id(), &seen_run_id)
            .unwrap();
        assert_eq!(run.info().status(), RunStatus::Failed);
        assert!(run.info().end_time().is_some());
        // partial logging is kept, not rolled back
        assert_eq!(run.metric("rmse"), Some(1.0));
    }

    #[test]
    fn with_run_finishes_scope_on_success() {
        let (_dir, store) = store();
        let experiment = store.experiment("success").unwrap();

        let (run_id, value) = store
            .with_run(&experiment, |run| {
                run.log_metric("rmse", 0.4)?;
                Ok::<_, TrackerError>(42)
            })
            .unwrap();

        assert_eq!(value, 42);
        let run = store.get_run(experiment.experiment_id(), &run_id).unwrap();
        assert_eq!(run.info().status(), RunStatus::Finished);
    }

    #[test]
    fn artifacts_are_copied_under_the_run() {
        let (dir, store) = store();
        let experiment = store.experiment("artifacts").unwrap();

        let source = dir.path().join("cv-curve-test.png");
        fs::write(&source, b"not really a png").unwrap();

        let mut run = store.start_run(&experiment).unwrap();
        let stored = run.log_artifact(&source).unwrap();
        let artifact_uri = run.artifact_uri().to_string();
        run.finish().unwrap();

        assert!(stored.starts_with(&artifact_uri));
        assert_eq!(fs::read(&stored).unwrap(), b"not really a png");
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct ToyModel {
        weights: Vec<f64>,
        intercept: f64,
    }

    #[test]
    fn registered_models_can_be_reloaded() {
        let (_dir, store) = store();
        let experiment = store.experiment("models").unwrap();

        let model = ToyModel {
            weights: vec![0.25, -0.5],
            intercept: 5.5,
        };

        let mut run = store.start_run(&experiment).unwrap();
        let uri = run.register_model("wine-model", &model).unwrap();
        run.finish().unwrap();

        let reloaded: ToyModel = load_model(&uri).unwrap();
        assert_eq!(reloaded, model);

        let missing = load_model::<ToyModel>("/nonexistent/wine-model");
        assert!(matches!(missing, Err(TrackerError::ModelNotFound(_))));
    }
}
