//! Tool catalog: typed metadata, argument checks, prompt generation.
//!
//! The catalog only holds metadata. Handlers live in the toolkit; the catalog
//! is what the agent layer reads to decide which tool to call and how.

use super::enums::{RiskSemantic, RiskSeverity, ToolCategory};
use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

// =============================================================================
// Parameter types
// =============================================================================

/// Argument type accepted by a tool parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
    Int,
    Bool,
    Enum(Vec<String>),
    Optional(Box<ParamType>),
}

impl ParamType {
    /// Check a JSON value against this type.
    pub fn check(&self, value: &Value) -> std::result::Result<(), String> {
        let ok = match self {
            ParamType::String => value.is_string(),
            ParamType::Int => value.is_i64() || value.is_u64(),
            ParamType::Bool => value.is_boolean(),
            ParamType::Enum(variants) => {
                let Some(s) = value.as_str() else {
                    return Err(format!("expected string for enum, got {}", json_kind(value)));
                };
                if !variants.iter().any(|v| v == s) {
                    return Err(format!(
                        "invalid enum value '{}', expected one of: {}",
                        s,
                        variants.join(", ")
                    ));
                }
                true
            }
            ParamType::Optional(inner) => return if value.is_null() { Ok(()) } else { inner.check(value) },
        };

        if ok {
            Ok(())
        } else {
            Err(format!("expected {}, got {}", self.display_name(), json_kind(value)))
        }
    }

    /// Type name as shown in prompts and error messages.
    pub fn display_name(&self) -> String {
        match self {
            ParamType::String => "string".to_string(),
            ParamType::Int => "integer".to_string(),
            ParamType::Bool => "boolean".to_string(),
            ParamType::Enum(variants) => format!("enum({})", variants.join("|")),
            ParamType::Optional(inner) => format!("{}?", inner.display_name()),
        }
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Parameter definition
// =============================================================================

/// One named tool argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDef {
    pub name: String,
    pub param_type: ParamType,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ParamDef {
    pub fn required(name: &str, param_type: ParamType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            description: description.to_string(),
            default: None,
        }
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none() && !matches!(self.param_type, ParamType::Optional(_))
    }
}

// =============================================================================
// Tool entry
// =============================================================================

/// Everything the agent layer knows about a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolEntry {
    pub id: String,
    pub description: String,
    pub parameters: Vec<ParamDef>,
    pub category: ToolCategory,
    pub risk_semantic: RiskSemantic,
    pub risk_severity: RiskSeverity,
    /// Status line shown while the tool runs.
    pub thinking_message: String,
    /// JSON schema of the argument object.
    #[serde(default)]
    pub input_schema: Value,
}

impl ToolEntry {
    /// `- tool_id(param: type, optional?: type): description`
    pub fn to_prompt_line(&self) -> String {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| {
                let marker = if p.is_required() { "" } else { "?" };
                format!("{}{}: {}", p.name, marker, p.param_type.display_name())
            })
            .collect();

        format!("- {}({}): {}", self.id, params.join(", "), self.description)
    }
}

// =============================================================================
// Tool catalog
// =============================================================================

/// Tool metadata keyed by id, iterated in id order.
#[derive(Debug, Default)]
pub struct ToolCatalog {
    entries: BTreeMap<String, ToolEntry>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool entry, replacing any entry with the same id.
    pub fn register(&mut self, entry: ToolEntry) -> Result<()> {
        if entry.id.trim().is_empty() {
            return Err(Error::validation("tool id cannot be empty"));
        }
        self.entries.insert(entry.id.clone(), entry);
        Ok(())
    }

    pub fn get(&self, tool_id: &str) -> Option<&ToolEntry> {
        self.entries.get(tool_id)
    }

    pub fn has_tool(&self, tool_id: &str) -> bool {
        self.entries.contains_key(tool_id)
    }

    pub fn list_ids(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn list_entries(&self) -> Vec<&ToolEntry> {
        self.entries.values().collect()
    }

    fn entry(&self, tool_id: &str) -> Result<&ToolEntry> {
        self.entries
            .get(tool_id)
            .ok_or_else(|| Error::not_found(format!("unknown tool: {}", tool_id)))
    }

    /// Check arguments against a tool's parameters.
    ///
    /// Returns every problem found; an empty list means the arguments are valid.
    /// Unknown tools and non-object arguments are errors.
    pub fn validate_params(&self, tool_id: &str, params: &Value) -> Result<Vec<String>> {
        let entry = self.entry(tool_id)?;
        let args = params
            .as_object()
            .ok_or_else(|| Error::validation("arguments must be a JSON object"))?;

        let mut problems: Vec<String> = entry
            .parameters
            .iter()
            .filter(|p| p.is_required() && !args.contains_key(&p.name))
            .map(|p| format!("missing required parameter: {}", p.name))
            .collect();

        for (key, value) in args {
            match entry.parameters.iter().find(|p| &p.name == key) {
                Some(def) => {
                    if let Err(e) = def.param_type.check(value) {
                        problems.push(format!("parameter '{}': {}", key, e));
                    }
                }
                None => problems.push(format!("unknown parameter: {}", key)),
            }
        }

        Ok(problems)
    }

    /// Insert defaults for absent parameters. Present values are left alone.
    pub fn fill_defaults(&self, tool_id: &str, params: &mut Map<String, Value>) -> Result<()> {
        let entry = self.entry(tool_id)?;
        for def in &entry.parameters {
            if let Some(default) = &def.default {
                params
                    .entry(def.name.clone())
                    .or_insert_with(|| default.clone());
            }
        }
        Ok(())
    }

    /// Tool list for an LLM prompt, optionally restricted to `allowed_tools`.
    ///
    /// Empty when no listed tool is registered.
    pub fn generate_prompt(&self, allowed_tools: Option<&[String]>) -> String {
        let entries: Vec<&ToolEntry> = match allowed_tools {
            Some(allowed) => allowed.iter().filter_map(|id| self.entries.get(id)).collect(),
            None => self.list_entries(),
        };

        if entries.is_empty() {
            return String::new();
        }

        std::iter::once("Available tools:".to_string())
            .chain(entries.iter().map(|e| e.to_prompt_line()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
