//! JSON fixtures seeding the in-memory store and the static runner.
//!
//! ```json
//! {
//!   "experiments": [{"id": 1, "team_id": 1, "name": "...", ...}],
//!   "results": [{"experiment_id": 1, "result": {...}}]
//! }
//! ```

use super::{Experiment, InMemoryExperimentStore, PrecomputedResult, StaticQueryRunner};
use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Experiments plus precomputed exposure results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub experiments: Vec<Experiment>,
    #[serde(default)]
    pub results: Vec<PrecomputedResult>,
}

impl Fixture {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::store(format!("invalid fixture: {}", e)))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::store(format!("invalid fixture {}: {}", path.display(), e)))
    }

    /// Split into the two collaborators.
    pub fn into_parts(self) -> (InMemoryExperimentStore, StaticQueryRunner) {
        (
            InMemoryExperimentStore::with_experiments(self.experiments),
            StaticQueryRunner::from_precomputed(self.results),
        )
    }
}
