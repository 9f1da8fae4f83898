//! Exposure queries and the runner that computes them.
//!
//! The statistics live outside this crate. An `ExposureQuery` is assembled
//! from an experiment, handed to an `ExposureQueryRunner` once, and the opaque
//! result is passed through untouched.

use super::Experiment;
use crate::types::{ExperimentId, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Kind tag the runner dispatches on.
pub const EXPOSURE_QUERY_KIND: &str = "ExperimentExposureQuery";

/// Request describing which exposures to compute for an experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureQuery {
    pub kind: String,
    pub experiment_id: ExperimentId,
    pub experiment_name: String,
    pub feature_flag: Value,
    pub holdout: Option<Value>,
    /// RFC 3339, absent when the experiment has not started.
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub exposure_criteria: Option<Value>,
}

impl ExposureQuery {
    /// Assemble the request from a stored experiment.
    pub fn from_experiment(experiment: &Experiment) -> Result<Self> {
        let holdout = experiment
            .holdout
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;

        Ok(Self {
            kind: EXPOSURE_QUERY_KIND.to_string(),
            experiment_id: experiment.id,
            experiment_name: experiment.name.clone(),
            feature_flag: serde_json::to_value(&experiment.feature_flag)?,
            holdout,
            start_date: experiment.start_date.map(|d| d.to_rfc3339()),
            end_date: experiment.end_date.map(|d| d.to_rfc3339()),
            exposure_criteria: experiment.exposure_criteria.clone(),
        })
    }
}

/// External exposure/statistics computation.
///
/// `Ok(None)` means nothing has been computed yet; that is not a fault.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExposureQueryRunner: Send + Sync {
    async fn calculate(&self, query: &ExposureQuery) -> Result<Option<Value>>;
}

/// Runner serving precomputed results keyed by experiment id.
#[derive(Debug, Default, Clone)]
pub struct StaticQueryRunner {
    results: HashMap<ExperimentId, Value>,
}

/// One precomputed result, as stored in fixtures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecomputedResult {
    pub experiment_id: ExperimentId,
    pub result: Value,
}

impl StaticQueryRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(mut self, experiment_id: ExperimentId, result: Value) -> Self {
        self.results.insert(experiment_id, result);
        self
    }

    pub fn from_precomputed(entries: impl IntoIterator<Item = PrecomputedResult>) -> Self {
        Self {
            results: entries
                .into_iter()
                .map(|e| (e.experiment_id, e.result))
                .collect(),
        }
    }
}

#[async_trait]
impl ExposureQueryRunner for StaticQueryRunner {
    async fn calculate(&self, query: &ExposureQuery) -> Result<Option<Value>> {
        Ok(self.results.get(&query.experiment_id).cloned())
    }
}
