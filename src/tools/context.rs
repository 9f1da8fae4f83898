//! Per-call context and the output shapes tools return.

use crate::types::{RequestId, TeamId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who is calling. Every store query is scoped to `team_id`; a context
/// without a team is valid and yields empty results.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub team_id: Option<TeamId>,
    pub request_id: RequestId,
}

impl ToolContext {
    pub fn new(team_id: Option<TeamId>) -> Self {
        Self {
            team_id,
            request_id: RequestId::new(),
        }
    }

    pub fn for_team(team_id: TeamId) -> Self {
        Self::new(Some(team_id))
    }

    pub fn without_team() -> Self {
        Self::new(None)
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = request_id;
        self
    }
}

/// Typed handler result: a message for the agent plus a structured artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput<T> {
    pub message: String,
    pub artifact: T,
}

impl<T> ToolOutput<T> {
    pub fn new(message: impl Into<String>, artifact: T) -> Self {
        Self {
            message: message.into(),
            artifact,
        }
    }
}

impl<T: Default> ToolOutput<T> {
    /// Message with an empty artifact.
    pub fn empty(message: impl Into<String>) -> Self {
        Self::new(message, T::default())
    }
}

/// Handler result at the JSON dispatch boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub message: String,
    pub artifact: Value,
}
