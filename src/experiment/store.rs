//! Experiment store: the read-only record collaborator behind both tools.
//!
//! The tools only need one query shape: team-scoped, optionally narrowed by a
//! case-insensitive name substring or an id, with inactive rows excluded,
//! newest first. `ExperimentFilter` carries that shape; stores apply it.

use super::Experiment;
use crate::types::{ExperimentId, Result, TeamId};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

// =============================================================================
// Filter
// =============================================================================

/// Team-scoped experiment query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentFilter {
    pub team_id: TeamId,
    /// Case-insensitive substring of the name. Empty matches everything.
    pub name_icontains: Option<String>,
    pub id: Option<ExperimentId>,
    /// Exclude soft-deleted and archived experiments.
    pub active_only: bool,
}

impl ExperimentFilter {
    /// Active experiments of one team.
    pub fn for_team(team_id: TeamId) -> Self {
        Self {
            team_id,
            name_icontains: None,
            id: None,
            active_only: true,
        }
    }

    pub fn name_icontains(mut self, query: impl Into<String>) -> Self {
        self.name_icontains = Some(query.into());
        self
    }

    pub fn id(mut self, id: ExperimentId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn include_inactive(mut self) -> Self {
        self.active_only = false;
        self
    }

    /// Whether a record satisfies every condition of the filter.
    pub fn matches(&self, experiment: &Experiment) -> bool {
        if experiment.team_id != self.team_id {
            return false;
        }
        if self.active_only && !experiment.is_active() {
            return false;
        }
        if let Some(id) = self.id {
            if experiment.id != id {
                return false;
            }
        }
        if let Some(needle) = &self.name_icontains {
            if !fold_case(&experiment.name).contains(&fold_case(needle)) {
                return false;
            }
        }
        true
    }
}

/// Lowercase each char on its own, without `str::to_lowercase`'s final-sigma
/// context, so a substring folds the same way as the name containing it.
fn fold_case(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

// =============================================================================
// Store trait
// =============================================================================

/// Tenant-scoped experiment record store.
///
/// Implementations return matches ordered by creation time, newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExperimentStore: Send + Sync {
    async fn filter(&self, filter: &ExperimentFilter) -> Result<Vec<Experiment>>;
}

// =============================================================================
// In-memory store
// =============================================================================

/// In-memory store keyed by experiment id.
#[derive(Debug, Default)]
pub struct InMemoryExperimentStore {
    experiments: RwLock<HashMap<ExperimentId, Experiment>>,
}

impl InMemoryExperimentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a list of records. Later duplicates replace earlier ones.
    pub fn with_experiments(experiments: impl IntoIterator<Item = Experiment>) -> Self {
        let map = experiments.into_iter().map(|e| (e.id, e)).collect();
        Self {
            experiments: RwLock::new(map),
        }
    }

    /// Insert or replace a record.
    pub async fn upsert(&self, experiment: Experiment) {
        self.experiments
            .write()
            .await
            .insert(experiment.id, experiment);
    }

    pub async fn len(&self) -> usize {
        self.experiments.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.experiments.read().await.is_empty()
    }
}

#[async_trait]
impl ExperimentStore for InMemoryExperimentStore {
    async fn filter(&self, filter: &ExperimentFilter) -> Result<Vec<Experiment>> {
        let guard = self.experiments.read().await;
        let mut matches: Vec<Experiment> = guard
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();

        // Newest first; id breaks ties so results are stable.
        matches.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(matches)
    }
}

// =============================================================================
// Tests
// =============================================================================
