//! Toolkit: the dispatch contract between the agent layer and the handlers.
//!
//! A dispatch call goes: catalog lookup → default filling → argument
//! validation → handler. Contract violations (unknown tool, bad arguments) are
//! returned as errors. Handler faults are not: handlers turn them into messages.

use super::analyze::AnalyzeExperimentTool;
use super::catalog::{ToolCatalog, ToolEntry};
use super::context::{ToolContext, ToolResponse};
use super::search::SearchExperimentsTool;
use super::{ANALYZE_EXPERIMENT, SEARCH_EXPERIMENTS};
use crate::experiment::{ExperimentStore, ExposureQueryRunner};
use crate::types::{Error, Result, ToolsConfig};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};

/// A handler the toolkit can dispatch to.
#[async_trait]
pub trait ExperimentTool: Send + Sync {
    /// Catalog metadata. `entry().id` is the dispatch key.
    fn entry(&self) -> ToolEntry;

    /// Run with already-validated JSON arguments.
    async fn invoke(&self, ctx: &ToolContext, args: Value) -> Result<ToolResponse>;

    /// Extra system prompt text this tool contributes, if any.
    async fn system_prompt(&self, _ctx: &ToolContext) -> Option<String> {
        None
    }
}

/// JSON schema of a tool's argument struct.
pub(crate) fn args_schema<T: JsonSchema>() -> Value {
    serde_json::to_value(schemars::schema_for!(T)).unwrap_or(Value::Null)
}

/// Deserialize arguments, mapping failures to a validation error.
pub(crate) fn parse_args<T: DeserializeOwned>(tool_id: &str, args: Value) -> Result<T> {
    serde_json::from_value(args)
        .map_err(|e| Error::validation(format!("invalid arguments for {}: {}", tool_id, e)))
}

/// Catalog plus handlers over one store and one runner.
pub struct ExperimentToolkit {
    catalog: ToolCatalog,
    tools: HashMap<String, Arc<dyn ExperimentTool>>,
}

impl fmt::Debug for ExperimentToolkit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExperimentToolkit")
            .field("tools", &self.catalog.list_ids())
            .finish()
    }
}

impl ExperimentToolkit {
    /// Toolkit exposing every tool.
    pub fn new(
        store: Arc<dyn ExperimentStore>,
        runner: Arc<dyn ExposureQueryRunner>,
    ) -> Result<Self> {
        Self::from_config(&ToolsConfig::default(), store, runner)
    }

    /// Toolkit exposing the tools listed in `config.enabled`.
    pub fn from_config(
        config: &ToolsConfig,
        store: Arc<dyn ExperimentStore>,
        runner: Arc<dyn ExposureQueryRunner>,
    ) -> Result<Self> {
        let mut toolkit = Self {
            catalog: ToolCatalog::new(),
            tools: HashMap::new(),
        };

        for tool_id in &config.enabled {
            let tool: Arc<dyn ExperimentTool> = match tool_id.as_str() {
                SEARCH_EXPERIMENTS => Arc::new(SearchExperimentsTool::new(store.clone())),
                ANALYZE_EXPERIMENT => {
                    Arc::new(AnalyzeExperimentTool::new(store.clone(), runner.clone()))
                }
                other => {
                    return Err(Error::validation(format!(
                        "unknown tool in tools.enabled: {}",
                        other
                    )))
                }
            };
            toolkit.register(tool)?;
        }

        Ok(toolkit)
    }

    /// Add a handler and its catalog entry.
    pub fn register(&mut self, tool: Arc<dyn ExperimentTool>) -> Result<()> {
        let entry = tool.entry();
        let id = entry.id.clone();
        self.catalog.register(entry)?;
        self.tools.insert(id, tool);
        Ok(())
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Tool list prompt followed by each tool's own system prompt section.
    pub async fn system_prompt(&self, ctx: &ToolContext) -> String {
        let mut sections = vec![self.catalog.generate_prompt(None)];
        for id in self.catalog.list_ids() {
            if let Some(tool) = self.tools.get(&id) {
                if let Some(section) = tool.system_prompt(ctx).await {
                    sections.push(section);
                }
            }
        }
        sections.retain(|s| !s.is_empty());
        sections.join("\n\n")
    }

    /// Validate arguments and run one tool call.
    pub async fn dispatch(
        &self,
        ctx: &ToolContext,
        tool_id: &str,
        params: Value,
    ) -> Result<ToolResponse> {
        let tool = self
            .tools
            .get(tool_id)
            .ok_or_else(|| Error::not_found(format!("unknown tool: {}", tool_id)))?;

        let mut args = match params {
            Value::Object(map) => map,
            Value::Null => serde_json::Map::new(),
            _ => return Err(Error::validation("arguments must be a JSON object")),
        };
        self.catalog.fill_defaults(tool_id, &mut args)?;

        let args = Value::Object(args);
        let problems = self.catalog.validate_params(tool_id, &args)?;
        if !problems.is_empty() {
            return Err(Error::validation(format!(
                "invalid arguments for {}: {}",
                tool_id,
                problems.join("; ")
            )));
        }

        let span = info_span!(
            "tool_call",
            tool = tool_id,
            request_id = %ctx.request_id,
            team_id = ctx.team_id.map(|t| t.get()),
        );
        async move {
            let response = tool.invoke(ctx, args).await?;
            info!(reply = %response.message, "tool call finished");
            Ok::<_, Error>(response)
        }
        .instrument(span)
        .await
    }
}
