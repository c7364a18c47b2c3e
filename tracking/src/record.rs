//! Logged key/value records owned by a run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A logged parameter
///
/// Parameters are stored verbatim as strings, so querying a run returns
/// exactly the value that was logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    key: String,
    value: String,
}

impl Param {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A logged metric value
///
/// Metrics carry the wall-clock time they were logged at; a run may log the
/// same key repeatedly, in which case the latest value wins when querying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    key: String,
    value: f64,
    timestamp: DateTime<Utc>,
}

impl MetricRecord {
    pub fn new(key: impl Into<String>, value: f64) -> Self {
        Self {
            key: key.into(),
            value,
            timestamp: Utc::now(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
