//! Run records - one recorded execution of a training procedure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{MetricRecord, Param};

/// Lifecycle status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Run is currently executing.
    Running,
    /// Run completed successfully.
    Finished,
    /// Run was aborted by an error.
    Failed,
}

/// Identity and lifecycle of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInfo {
    run_id: String,
    experiment_id: String,
    status: RunStatus,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    artifact_uri: String,
}

impl RunInfo {
    pub(crate) fn new(
        run_id: impl Into<String>,
        experiment_id: impl Into<String>,
        artifact_uri: impl Into<String>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            experiment_id: experiment_id.into(),
            status: RunStatus::Running,
            start_time: Utc::now(),
            end_time: None,
            artifact_uri: artifact_uri.into(),
        }
    }

    /// Get the run ID
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the parent experiment ID
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Get the current run status
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Get the start timestamp
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Get the end timestamp, if the run has been closed
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Get the directory artifacts of this run are stored under
    pub fn artifact_uri(&self) -> &str {
        &self.artifact_uri
    }

    pub(crate) fn close(&mut self, status: RunStatus) {
        self.status = status;
        self.end_time = Some(Utc::now());
    }
}

/// Everything a run has logged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunData {
    params: Vec<Param>,
    metrics: Vec<MetricRecord>,
}

impl RunData {
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn metrics(&self) -> &[MetricRecord] {
        &self.metrics
    }

    pub(crate) fn push_param(&mut self, param: Param) {
        self.params.push(param);
    }

    pub(crate) fn push_metric(&mut self, metric: MetricRecord) {
        self.metrics.push(metric);
    }
}

/// A run with its identity and logged data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    info: RunInfo,
    data: RunData,
}

impl Run {
    pub(crate) fn new(info: RunInfo) -> Self {
        Self {
            info,
            data: RunData::default(),
        }
    }

    pub fn info(&self) -> &RunInfo {
        &self.info
    }

    pub fn data(&self) -> &RunData {
        &self.data
    }

    pub(crate) fn info_mut(&mut self) -> &mut RunInfo {
        &mut self.info
    }

    pub(crate) fn data_mut(&mut self) -> &mut RunData {
        &mut self.data
    }

    /// The logged value of a parameter, exactly as it was logged
    pub fn param(&self, key: &str) -> Option<&str> {
        self.data
            .params
            .iter()
            .rev()
            .find(|param| param.key() == key)
            .map(|param| param.value())
    }

    /// The latest logged value of a metric
    pub fn metric(&self, key: &str) -> Option<f64> {
        self.data
            .metrics
            .iter()
            .rev()
            .find(|metric| metric.key() == key)
            .map(|metric| metric.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_starts_running() {
        let run = Run::new(RunInfo::new("run-1", "exp-1", "/tmp/artifacts"));

        assert_eq!(run.info().status(), RunStatus::Running);
        assert_eq!(run.info().end_time(), None);
    }

    #[test]
    fn close_sets_status_and_end_time() {
        let mut run = Run::new(RunInfo::new("run-1", "exp-1", "/tmp/artifacts"));
        run.info_mut().close(RunStatus::Finished);

        assert_eq!(run.info().status(), RunStatus::Finished);
        assert!(run.info().end_time().is_some());
    }

    #[test]
    fn latest_metric_value_wins() {
        let mut run = Run::new(RunInfo::new("run-1", "exp-1", "/tmp/artifacts"));
        run.data_mut().push_metric(MetricRecord::new("rmse", 0.9));
        run.data_mut().push_metric(MetricRecord::new("rmse", 0.7));

        assert_eq!(run.metric("rmse"), Some(0.7));
        assert_eq!(run.metric("mae"), None);
    }
}
