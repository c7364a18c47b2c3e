//! Experiment record - a named collection of related runs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named scope grouping related runs
///
/// Experiments are created through
/// [`ExperimentStore::experiment`](crate::ExperimentStore::experiment) and
/// identified by an opaque ID; the artifact location is the directory all
/// run artifacts are stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experiment {
    experiment_id: String,
    name: String,
    artifact_location: String,
    created_at: DateTime<Utc>,
}

impl Experiment {
    pub(crate) fn new(
        experiment_id: impl Into<String>,
        name: impl Into<String>,
        artifact_location: impl Into<String>,
    ) -> Self {
        Self {
            experiment_id: experiment_id.into(),
            name: name.into(),
            artifact_location: artifact_location.into(),
            created_at: Utc::now(),
        }
    }

    /// Get the experiment ID
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Get the experiment name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the directory runs of this experiment live under
    pub fn artifact_location(&self) -> &str {
        &self.artifact_location
    }

    /// Get the creation timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
