//! Experiment records as the tools read them.

use crate::types::{ExperimentId, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Feature flag an experiment is rolled out behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureFlagRef {
    pub id: i64,
    pub key: String,
    /// Flag filters (variants, rollout groups). Opaque here.
    #[serde(default)]
    pub filters: Value,
}

/// Holdout group excluded from the experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holdout {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub filters: Value,
}

/// A tracked A/B test. Created and mutated elsewhere; read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub id: ExperimentId,
    pub team_id: TeamId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub feature_flag: FeatureFlagRef,
    #[serde(default)]
    pub holdout: Option<Holdout>,
    #[serde(default)]
    pub exposure_criteria: Option<Value>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub archived: bool,
}

impl Experiment {
    /// Neither soft-deleted nor archived.
    pub fn is_active(&self) -> bool {
        !self.deleted && !self.archived
    }

    /// Project to the lightweight search result shape.
    pub fn summary(&self) -> ExperimentSummary {
        ExperimentSummary {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Lightweight record returned by `search_experiments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    pub id: ExperimentId,
    pub name: String,
    pub description: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}
