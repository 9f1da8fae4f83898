//! Tool classification enums shared with the agent layer.

use serde::{Deserialize, Serialize};

/// What a tool does to the data it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSemantic {
    ReadOnly,
}

/// How bad a wrong call would be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSeverity {
    Low,
    Medium,
    High,
}

/// Tool category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    /// Lookups against the record store.
    Search,
    /// Calls that hand work to an external computation.
    Analysis,
}
