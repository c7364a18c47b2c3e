//! The wine-quality experiment workflow
//!
//! This crate wires the workspace together into the train/evaluate/select
//! workflow:
//!
//! 1. [`execute_run`](executor::execute_run) performs one tracked
//!    train/evaluate/log cycle for a hyper-parameter pair,
//! 2. [`select_best_run`](selector::select_best_run) queries all logged runs
//!    and picks the one with the highest R²,
//! 3. [`predict_with_model`](inference::predict_with_model) reloads the
//!    winning registered model and scores new feature rows.
//!
//! The `wine-quality` binary runs the whole sequence over three
//! hyper-parameter pairs, each inside its own error boundary, so one failing
//! configuration never prevents evaluation of the others.

pub mod error;
pub mod executor;
pub mod inference;
pub mod plot;
pub mod selector;

pub use error::PipelineError;
pub use executor::{execute_run, ExecutedRun, RunSpec};
pub use inference::predict_with_model;
pub use selector::{select_best_run, BestRun};
