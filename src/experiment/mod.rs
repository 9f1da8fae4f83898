//! Experiment records and the collaborators the tools read through.
//!
//! - **model**: `Experiment` and its search projection
//! - **store**: tenant-scoped record store trait plus an in-memory store
//! - **exposure**: exposure query value object and the external runner trait
//! - **fixture**: JSON seed data for the in-memory collaborators

pub mod exposure;
pub mod fixture;
pub mod model;
pub mod store;

pub use exposure::{
    ExposureQuery, ExposureQueryRunner, PrecomputedResult, StaticQueryRunner, EXPOSURE_QUERY_KIND,
};
pub use fixture::Fixture;
pub use model::{Experiment, ExperimentSummary, FeatureFlagRef, Holdout};
pub use store::{ExperimentFilter, ExperimentStore, InMemoryExperimentStore};

#[cfg(test)]
pub use exposure::MockExposureQueryRunner;
#[cfg(test)]
pub use store::MockExperimentStore;
