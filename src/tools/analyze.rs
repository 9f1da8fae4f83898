//! `analyze_experiment`: hand an experiment to the exposure query runner.

use super::catalog::{ParamDef, ParamType, ToolEntry};
use super::context::{ToolContext, ToolOutput, ToolResponse};
use super::enums::{RiskSemantic, RiskSeverity, ToolCategory};
use super::toolkit::{args_schema, parse_args, ExperimentTool};
use super::{ANALYZE_EXPERIMENT, NO_TEAM_CONTEXT};
use crate::experiment::{
    Experiment, ExperimentFilter, ExperimentStore, ExposureQuery, ExposureQueryRunner,
};
use crate::types::{ExperimentId, Result, TeamId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

const DESCRIPTION: &str = "Compute exposure and conversion results for one experiment. \
Use search_experiments first to find the experiment id.";

const THINKING_MESSAGE: &str = "Analyzing experiment results";

/// Arguments of `analyze_experiment`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzeExperimentArgs {
    /// Id of the experiment to analyze, as returned by search_experiments.
    pub experiment_id: i64,
}

/// Experiment fields echoed back next to the computed results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedExperiment {
    pub id: ExperimentId,
    pub name: String,
    pub description: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub feature_flag_key: String,
}

impl From<&Experiment> for AnalyzedExperiment {
    fn from(e: &Experiment) -> Self {
        Self {
            id: e.id,
            name: e.name.clone(),
            description: e.description.clone(),
            start_date: e.start_date,
            end_date: e.end_date,
            feature_flag_key: e.feature_flag.key.clone(),
        }
    }
}

/// Successful analysis payload. `results` is whatever the runner produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentAnalysis {
    pub experiment: AnalyzedExperiment,
    pub results: Value,
}

enum Outcome {
    NotFound,
    Pending(Experiment),
    Computed(ExperimentAnalysis),
}

/// Looks up one experiment and forwards it to the runner.
pub struct AnalyzeExperimentTool {
    store: Arc<dyn ExperimentStore>,
    runner: Arc<dyn ExposureQueryRunner>,
}

impl fmt::Debug for AnalyzeExperimentTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzeExperimentTool").finish_non_exhaustive()
    }
}

impl AnalyzeExperimentTool {
    pub fn new(store: Arc<dyn ExperimentStore>, runner: Arc<dyn ExposureQueryRunner>) -> Self {
        Self { store, runner }
    }

    /// Run the analysis. Never fails: faults become a message with no payload.
    pub async fn run(
        &self,
        ctx: &ToolContext,
        experiment_id: i64,
    ) -> ToolOutput<Option<ExperimentAnalysis>> {
        let Some(team_id) = ctx.team_id else {
            return ToolOutput::empty(NO_TEAM_CONTEXT);
        };

        match self.analyze(team_id, experiment_id).await {
            Ok(Outcome::NotFound) => {
                debug!(team_id = %team_id, experiment_id, "experiment not found");
                ToolOutput::empty(format!("Experiment {} not found.", experiment_id))
            }
            Ok(Outcome::Pending(experiment)) => {
                debug!(team_id = %team_id, experiment_id, "no results computed yet");
                ToolOutput::empty(format!(
                    "Results are not yet available for experiment '{}'.",
                    experiment.name
                ))
            }
            Ok(Outcome::Computed(analysis)) => ToolOutput::new(
                format!(
                    "Analyzed experiment '{}' (ID: {}).",
                    analysis.experiment.name, analysis.experiment.id
                ),
                Some(analysis),
            ),
            Err(e) => {
                error!(error = %e, team_id = %team_id, experiment_id, "analyze_experiment_error");
                ToolOutput::empty(format!("Error analyzing experiment: {}", e))
            }
        }
    }

    async fn analyze(&self, team_id: TeamId, experiment_id: i64) -> Result<Outcome> {
        // Non-positive ids cannot exist; report them like any missing id.
        let Ok(id) = ExperimentId::from_raw(experiment_id) else {
            return Ok(Outcome::NotFound);
        };

        let filter = ExperimentFilter::for_team(team_id).id(id);
        let Some(experiment) = self.store.filter(&filter).await?.into_iter().next() else {
            return Ok(Outcome::NotFound);
        };

        let query = ExposureQuery::from_experiment(&experiment)?;
        match self.runner.calculate(&query).await? {
            None => Ok(Outcome::Pending(experiment)),
            Some(results) => Ok(Outcome::Computed(ExperimentAnalysis {
                experiment: AnalyzedExperiment::from(&experiment),
                results,
            })),
        }
    }
}

#[async_trait]
impl ExperimentTool for AnalyzeExperimentTool {
    fn entry(&self) -> ToolEntry {
        ToolEntry {
            id: ANALYZE_EXPERIMENT.to_string(),
            description: DESCRIPTION.to_string(),
            parameters: vec![ParamDef::required(
                "experiment_id",
                ParamType::Int,
                "Experiment id from search_experiments",
            )],
            category: ToolCategory::Analysis,
            risk_semantic: RiskSemantic::ReadOnly,
            risk_severity: RiskSeverity::Low,
            thinking_message: THINKING_MESSAGE.to_string(),
            input_schema: args_schema::<AnalyzeExperimentArgs>(),
        }
    }

    async fn invoke(&self, ctx: &ToolContext, args: Value) -> Result<ToolResponse> {
        let args: AnalyzeExperimentArgs = parse_args(ANALYZE_EXPERIMENT, args)?;
        let output = self.run(ctx, args.experiment_id).await;
        let artifact = match output.artifact {
            Some(analysis) => serde_json::to_value(analysis)?,
            None => Value::Object(serde_json::Map::new()),
        };
        Ok(ToolResponse {
            message: output.message,
            artifact,
        })
    }
}
