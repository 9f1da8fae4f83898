//! Request router: maps dispatch methods onto the toolkit.

use crate::tools::{ExperimentToolkit, ToolContext};
use crate::types::{Error, RequestId, Result, TeamId};
use serde_json::{json, Value};

/// Route one request body to the toolkit.
///
/// Methods:
/// - `CallTool` `{tool, params?, team_id?}` → `{message, artifact}`
/// - `ListTools` → `{tools, count}`
/// - `GetToolEntry` `{tool_id}` → tool entry
/// - `GenerateToolPrompt` `{team_id?}` → `{prompt}`
pub async fn route_request(
    toolkit: &ExperimentToolkit,
    default_team: Option<TeamId>,
    request_id: RequestId,
    method: &str,
    body: Value,
) -> Result<Value> {
    match method {
        "CallTool" => {
            let tool = str_field(&body, "tool")?;
            let team_id = team_field(&body)?.or(default_team);
            let params = body.get("params").cloned().unwrap_or(Value::Null);

            let ctx = ToolContext::new(team_id).with_request_id(request_id);
            let response = toolkit.dispatch(&ctx, &tool, params).await?;
            Ok(serde_json::to_value(response)?)
        }

        "ListTools" => {
            let entries = toolkit
                .catalog()
                .list_entries()
                .into_iter()
                .map(serde_json::to_value)
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(json!({
                "count": entries.len(),
                "tools": entries,
            }))
        }

        "GetToolEntry" => {
            let tool_id = str_field(&body, "tool_id")?;
            let entry = toolkit
                .catalog()
                .get(&tool_id)
                .ok_or_else(|| Error::not_found(format!("unknown tool: {}", tool_id)))?;
            Ok(serde_json::to_value(entry)?)
        }

        "GenerateToolPrompt" => {
            let team_id = team_field(&body)?.or(default_team);
            let ctx = ToolContext::new(team_id).with_request_id(request_id);
            Ok(json!({ "prompt": toolkit.system_prompt(&ctx).await }))
        }

        _ => Err(Error::not_found(format!("unknown method: {}", method))),
    }
}

// =============================================================================
// Field helpers
// =============================================================================

pub fn str_field(body: &Value, key: &str) -> Result<String> {
    body.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| Error::validation(format!("missing required field: {}", key)))
}

/// Optional positive integer `team_id`.
pub fn team_field(body: &Value) -> Result<Option<TeamId>> {
    match body.get("team_id") {
        None | Some(Value::Null) => Ok(None),
        Some(v) => {
            let raw = v
                .as_i64()
                .ok_or_else(|| Error::validation("team_id must be an integer"))?;
            TeamId::from_raw(raw).map(Some).map_err(Error::validation)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_field() {
        let body = json!({"tool": "search_experiments", "n": 1});
        assert_eq!(str_field(&body, "tool").unwrap(), "search_experiments");
        assert!(str_field(&body, "n").is_err());
        assert!(str_field(&body, "missing").is_err());
    }

    #[test]
    fn test_team_field() {
        assert_eq!(team_field(&json!({})).unwrap(), None);
        assert_eq!(team_field(&json!({"team_id": null})).unwrap(), None);
        assert_eq!(team_field(&json!({"team_id": 4})).unwrap().map(TeamId::get), Some(4));
        assert!(team_field(&json!({"team_id": "4"})).is_err());
        assert!(team_field(&json!({"team_id": -1})).is_err());
    }
}
