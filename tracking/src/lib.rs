//! File-backed experiment tracking
//!
//! This crate records machine-learning training runs on the local
//! filesystem. Every run belongs to an experiment and owns its logged
//! parameters, metric values, uploaded artifacts and registered models.
//!
//! ## Schema overview
//!
//! ```text
//! Experiment (1) ──< Run (N)
//!                      │
//!                      ├──< Param        [key/value]
//!                      ├──< MetricRecord [key/value/timestamp]
//!                      └──< artifacts/   [files, registered models]
//! ```
//!
//! ## Storage layout
//!
//! ```text
//! <root>/<experiment_id>/experiment.json
//! <root>/<experiment_id>/<run_id>/run.json
//! <root>/<experiment_id>/<run_id>/artifacts/...
//! ```
//!
//! Every logging call rewrites `run.json` immediately, so whatever was
//! logged before a mid-run failure stays on disk; nothing is rolled back.
//!
//! ## Usage
//!
//! ```no_run
//! use cuvee_tracking::ExperimentStore;
//!
//! # fn main() -> cuvee_tracking::Result<()> {
//! let store = ExperimentStore::open("./runs")?;
//! let experiment = store.experiment("wine-quality")?;
//!
//! let mut run = store.start_run(&experiment)?;
//! run.log_param("alpha", 0.5)?;
//! run.log_metric("rmse", 0.73)?;
//! let run_id = run.finish()?;
//!
//! let ranked = store.search_runs(experiment.experiment_id(), "rmse")?;
//! assert_eq!(ranked[0].info().run_id(), run_id);
//! # Ok(())
//! # }
//! ```

mod error;
mod experiment;
mod record;
mod run;
mod store;

pub use error::{Result, TrackerError};
pub use experiment::Experiment;
pub use record::{MetricRecord, Param};
pub use run::{Run, RunData, RunInfo, RunStatus};
pub use store::{load_model, ActiveRun, ExperimentStore};
