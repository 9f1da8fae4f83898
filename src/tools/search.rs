//! `search_experiments`: find a team's experiments by name.

use super::catalog::{ParamDef, ParamType, ToolEntry};
use super::context::{ToolContext, ToolOutput, ToolResponse};
use super::enums::{RiskSemantic, RiskSeverity, ToolCategory};
use super::toolkit::{args_schema, parse_args, ExperimentTool};
use super::{NO_TEAM_CONTEXT, SEARCH_EXPERIMENTS};
use crate::experiment::{ExperimentFilter, ExperimentStore, ExperimentSummary};
use crate::types::{Result, TeamId};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, warn};

const DESCRIPTION: &str = "Find and analyze experiments. Always use this tool first when the user \
mentions experiments, A/B tests, or feature flags with variants. This is the primary tool for any \
experiment-related questions.";

const THINKING_MESSAGE: &str = "Searching for experiments";

const ROOT_SYSTEM_PROMPT: &str = "\
IMPORTANT: When users ask about experiments, A/B tests, or mention specific experiment names, \
you MUST use the search_experiments tool FIRST, not create_and_query_insight.

Use this tool for questions like:
- \"How's my sign-up experiment doing?\"
- \"Show me my experiments\"
- \"What's the status of the checkout test?\"
- \"Are any experiments running?\"
- Any mention of \"experiment\", \"A/B test\", \"test\", or \"variant\"

This tool finds experiments and returns their metadata. Afterwards you may use \
analyze_experiment or create_and_query_insight to dig into specific metrics.

Current experiments available: {current_experiments}";

/// Arguments of `search_experiments`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchExperimentsArgs {
    /// Search query for experiments. Can be a name, partial name, or empty string to list all
    /// experiments. Examples: 'sign-up', 'checkout', 'onboarding', or '' for all.
    pub query: String,
}

/// Case-insensitive name search over the caller's active experiments.
pub struct SearchExperimentsTool {
    store: Arc<dyn ExperimentStore>,
}

impl fmt::Debug for SearchExperimentsTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchExperimentsTool").finish_non_exhaustive()
    }
}

impl SearchExperimentsTool {
    pub fn new(store: Arc<dyn ExperimentStore>) -> Self {
        Self { store }
    }

    /// Run the search. Never fails: faults become a message with an empty list.
    pub async fn run(&self, ctx: &ToolContext, query: &str) -> ToolOutput<Vec<ExperimentSummary>> {
        let Some(team_id) = ctx.team_id else {
            return ToolOutput::empty(NO_TEAM_CONTEXT);
        };

        match self.search(team_id, query).await {
            Ok(results) if results.is_empty() => {
                debug!(team_id = %team_id, query, "no experiments matched");
                ToolOutput::empty(format!("No experiments found matching '{}'.", query))
            }
            Ok(results) => {
                debug!(team_id = %team_id, query, count = results.len(), "experiments matched");
                ToolOutput::new(
                    format!("Found {} experiments matching '{}'.", results.len(), query),
                    results,
                )
            }
            Err(e) => {
                error!(error = %e, team_id = %team_id, query, "search_experiments_error");
                ToolOutput::empty(format!("Error searching experiments: {}", e))
            }
        }
    }

    async fn search(&self, team_id: TeamId, query: &str) -> Result<Vec<ExperimentSummary>> {
        let filter = ExperimentFilter::for_team(team_id).name_icontains(query);
        let experiments = self.store.filter(&filter).await?;
        Ok(experiments.iter().map(|e| e.summary()).collect())
    }

    /// System prompt section steering the agent towards this tool, listing the
    /// caller's current experiments. Lookup faults degrade to an empty list.
    pub async fn root_system_prompt(&self, ctx: &ToolContext) -> String {
        let current = match ctx.team_id {
            Some(team_id) => self.search(team_id, "").await.unwrap_or_else(|e| {
                warn!(error = %e, team_id = %team_id, "could not list current experiments");
                Vec::new()
            }),
            None => Vec::new(),
        };
        render_root_system_prompt(&current)
    }
}

/// Fill the root system prompt template with `name (ID: id)` entries.
pub fn render_root_system_prompt(current: &[ExperimentSummary]) -> String {
    let listing = if current.is_empty() {
        "none".to_string()
    } else {
        current
            .iter()
            .map(|e| format!("{} (ID: {})", e.name, e.id))
            .collect::<Vec<_>>()
            .join(", ")
    };
    ROOT_SYSTEM_PROMPT.replace("{current_experiments}", &listing)
}

#[async_trait]
impl ExperimentTool for SearchExperimentsTool {
    fn entry(&self) -> ToolEntry {
        ToolEntry {
            id: SEARCH_EXPERIMENTS.to_string(),
            description: DESCRIPTION.to_string(),
            parameters: vec![ParamDef::required(
                "query",
                ParamType::String,
                "Name or partial name to match; empty lists all experiments",
            )],
            category: ToolCategory::Search,
            risk_semantic: RiskSemantic::ReadOnly,
            risk_severity: RiskSeverity::Low,
            thinking_message: THINKING_MESSAGE.to_string(),
            input_schema: args_schema::<SearchExperimentsArgs>(),
        }
    }

    async fn invoke(&self, ctx: &ToolContext, args: Value) -> Result<ToolResponse> {
        let args: SearchExperimentsArgs = parse_args(SEARCH_EXPERIMENTS, args)?;
        let output = self.run(ctx, &args.query).await;
        Ok(ToolResponse {
            message: output.message,
            artifact: serde_json::to_value(output.artifact)?,
        })
    }

    async fn system_prompt(&self, ctx: &ToolContext) -> Option<String> {
        Some(self.root_system_prompt(ctx).await)
    }
}
