//! Configuration structures.
//!
//! Configuration is loaded from a JSON file and environment variables. Every
//! section has defaults, so an empty file (or no file) is a valid config.

use crate::types::{Error, Result, TeamId};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable selecting the log format (`json` or anything else).
pub const ENV_LOG_FORMAT: &str = "EXPERIMENT_TOOLS_LOG_FORMAT";

/// Environment variable providing the default team id.
pub const ENV_TEAM_ID: &str = "EXPERIMENT_TOOLS_TEAM_ID";

/// Global configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Which tools the toolkit exposes.
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Tenant scoping.
    #[serde(default)]
    pub tenant: TenantConfig,
}

impl Config {
    /// Load a config file, then apply environment overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_json::from_str(&raw)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `EXPERIMENT_TOOLS_*` overrides on top of the loaded values.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(format) = std::env::var(ENV_LOG_FORMAT) {
            self.observability.json_logs = format.eq_ignore_ascii_case("json");
        }
        if let Ok(raw) = std::env::var(ENV_TEAM_ID) {
            let parsed: i64 = raw
                .trim()
                .parse()
                .map_err(|_| Error::validation(format!("{ENV_TEAM_ID} is not an integer: {raw}")))?;
            let team = TeamId::from_raw(parsed).map_err(Error::validation)?;
            self.tenant.default_team_id = Some(team);
        }
        Ok(())
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing log level used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Tool exposure configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Tool ids to register. Unknown ids are rejected when the toolkit is built.
    pub enabled: Vec<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            enabled: vec![
                crate::tools::SEARCH_EXPERIMENTS.to_string(),
                crate::tools::ANALYZE_EXPERIMENT.to_string(),
            ],
        }
    }
}

/// Tenant scoping configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TenantConfig {
    /// Team used when a request carries no team of its own.
    pub default_team_id: Option<TeamId>,
}
