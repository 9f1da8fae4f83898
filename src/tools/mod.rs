//! Agent-callable experiment tools: catalog, handlers, dispatch.
//!
//! Handlers never fail: store and runner faults come back as a message with an
//! empty artifact. The toolkit in front of them rejects unknown tools and
//! malformed arguments before a handler runs.

pub mod analyze;
pub mod catalog;
pub mod context;
pub mod enums;
pub mod search;
pub mod toolkit;

/// Tool id of the search handler.
pub const SEARCH_EXPERIMENTS: &str = "search_experiments";

/// Tool id of the analyze handler.
pub const ANALYZE_EXPERIMENT: &str = "analyze_experiment";

/// Message both handlers return when the caller has no team.
pub const NO_TEAM_CONTEXT: &str = "No team context provided.";

pub use analyze::{AnalyzeExperimentArgs, AnalyzeExperimentTool, AnalyzedExperiment, ExperimentAnalysis};
pub use catalog::{ParamDef, ParamType, ToolCatalog, ToolEntry};
pub use context::{ToolContext, ToolOutput, ToolResponse};
pub use enums::{RiskSemantic, RiskSeverity, ToolCategory};
pub use search::{render_root_system_prompt, SearchExperimentsArgs, SearchExperimentsTool};
pub use toolkit::{ExperimentTool, ExperimentToolkit};
