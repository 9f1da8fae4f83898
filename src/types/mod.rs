//! Core types shared by the store, the tools and the binary.
//!
//! - **IDs**: Strongly-typed identifiers (TeamId, ExperimentId, RequestId)
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Configuration structures loaded from file and environment

mod config;
mod errors;
mod ids;

pub use config::{
    Config, ObservabilityConfig, TenantConfig, ToolsConfig, ENV_LOG_FORMAT, ENV_TEAM_ID,
};
pub use errors::{Error, Result};
pub use ids::{ExperimentId, RequestId, TeamId};
