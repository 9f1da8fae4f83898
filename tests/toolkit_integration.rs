//! Toolkit integration tests: dispatch → handler → in-memory store/runner.

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use experiment_tools::experiment::{
    Experiment, ExperimentFilter, ExperimentStore, FeatureFlagRef, InMemoryExperimentStore,
    StaticQueryRunner,
};
use experiment_tools::tools::{ExperimentToolkit, ToolContext};
use experiment_tools::types::{ExperimentId, TeamId, ToolsConfig};
use experiment_tools::{Error, Result};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;

fn team(raw: i64) -> TeamId {
    TeamId::from_raw(raw).unwrap()
}

fn experiment(id: i64, team_id: i64, name: &str, age_days: i64) -> Experiment {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    Experiment {
        id: ExperimentId::from_raw(id).unwrap(),
        team_id: team(team_id),
        name: name.to_string(),
        description: format!("About {name}"),
        start_date: Some(now - Duration::days(age_days)),
        end_date: None,
        created_at: now - Duration::days(age_days),
        feature_flag: FeatureFlagRef {
            id: id * 10,
            key: name.to_lowercase().replace(' ', "-"),
            filters: json!({}),
        },
        holdout: None,
        exposure_criteria: None,
        deleted: false,
        archived: false,
    }
}

/// Team 1: "Sign-up flow" (older), "Checkout test" (newer), plus an archived
/// and a deleted record. Team 2 has its own checkout experiment.
fn seeded_store() -> InMemoryExperimentStore {
    let mut archived = experiment(3, 1, "Checkout archived", 1);
    archived.archived = true;
    let mut deleted = experiment(4, 1, "Checkout deleted", 1);
    deleted.deleted = true;

    InMemoryExperimentStore::with_experiments(vec![
        experiment(1, 1, "Sign-up flow", 20),
        experiment(2, 1, "Checkout test", 5),
        archived,
        deleted,
        experiment(5, 2, "Checkout other team", 2),
    ])
}

fn toolkit_with(runner: StaticQueryRunner) -> ExperimentToolkit {
    ExperimentToolkit::new(Arc::new(seeded_store()), Arc::new(runner)).unwrap()
}

fn names(artifact: &Value) -> Vec<String> {
    artifact
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap().to_string())
        .collect()
}

struct UnavailableStore;

#[async_trait]
impl ExperimentStore for UnavailableStore {
    async fn filter(&self, _filter: &ExperimentFilter) -> Result<Vec<Experiment>> {
        Err(Error::store("database is unavailable"))
    }
}

// =============================================================================
// search_experiments
// =============================================================================

#[tokio::test]
async fn test_search_matches_substring_case_insensitively() {
    let toolkit = toolkit_with(StaticQueryRunner::new());
    let ctx = ToolContext::for_team(team(1));

    let response = toolkit
        .dispatch(&ctx, "search_experiments", json!({"query": "check"}))
        .await
        .unwrap();

    assert_eq!(response.message, "Found 1 experiments matching 'check'.");
    assert_eq!(names(&response.artifact), vec!["Checkout test"]);
}

#[tokio::test]
async fn test_search_empty_query_lists_all_newest_first() {
    let toolkit = toolkit_with(StaticQueryRunner::new());
    let ctx = ToolContext::for_team(team(1));

    let response = toolkit
        .dispatch(&ctx, "search_experiments", json!({"query": ""}))
        .await
        .unwrap();

    assert_eq!(response.message, "Found 2 experiments matching ''.");
    assert_eq!(names(&response.artifact), vec!["Checkout test", "Sign-up flow"]);
}

#[tokio::test]
async fn test_search_returns_lightweight_records() {
    let toolkit = toolkit_with(StaticQueryRunner::new());
    let ctx = ToolContext::for_team(team(1));

    let response = toolkit
        .dispatch(&ctx, "search_experiments", json!({"query": "sign"}))
        .await
        .unwrap();

    let record = &response.artifact[0];
    let mut keys: Vec<&str> = record.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["description", "end_date", "id", "name", "start_date"]);
    assert_eq!(record["id"], 1);
    assert_eq!(record["end_date"], Value::Null);
}

#[tokio::test]
async fn test_search_no_matches() {
    let toolkit = toolkit_with(StaticQueryRunner::new());
    let ctx = ToolContext::for_team(team(1));

    let response = toolkit
        .dispatch(&ctx, "search_experiments", json!({"query": "pricing"}))
        .await
        .unwrap();

    assert_eq!(response.message, "No experiments found matching 'pricing'.");
    assert_eq!(response.artifact, json!([]));
}

#[tokio::test]
async fn test_missing_team_yields_fixed_message_for_both_tools() {
    let toolkit = toolkit_with(StaticQueryRunner::new());
    let ctx = ToolContext::without_team();

    let search = toolkit
        .dispatch(&ctx, "search_experiments", json!({"query": ""}))
        .await
        .unwrap();
    assert_eq!(search.message, "No team context provided.");
    assert_eq!(search.artifact, json!([]));

    let analyze = toolkit
        .dispatch(&ctx, "analyze_experiment", json!({"experiment_id": 1}))
        .await
        .unwrap();
    assert_eq!(analyze.message, "No team context provided.");
    assert_eq!(analyze.artifact, json!({}));
}

// =============================================================================
// analyze_experiment
// =============================================================================

#[tokio::test]
async fn test_analyze_returns_metadata_and_results() {
    let runner = StaticQueryRunner::new().with_result(
        ExperimentId::from_raw(2).unwrap(),
        json!({"probability": {"control": 0.1, "test": 0.9}, "significant": true}),
    );
    let toolkit = toolkit_with(runner);
    let ctx = ToolContext::for_team(team(1));

    let response = toolkit
        .dispatch(&ctx, "analyze_experiment", json!({"experiment_id": 2}))
        .await
        .unwrap();

    assert_eq!(response.message, "Analyzed experiment 'Checkout test' (ID: 2).");
    assert_eq!(response.artifact["experiment"]["name"], "Checkout test");
    assert_eq!(response.artifact["experiment"]["feature_flag_key"], "checkout-test");
    assert_eq!(response.artifact["results"]["significant"], true);
}

#[tokio::test]
async fn test_analyze_without_results_yet() {
    let toolkit = toolkit_with(StaticQueryRunner::new());
    let ctx = ToolContext::for_team(team(1));

    let response = toolkit
        .dispatch(&ctx, "analyze_experiment", json!({"experiment_id": 1}))
        .await
        .unwrap();

    assert_eq!(
        response.message,
        "Results are not yet available for experiment 'Sign-up flow'."
    );
    assert_eq!(response.artifact, json!({}));
}

#[tokio::test]
async fn test_analyze_respects_team_and_flags() {
    let toolkit = toolkit_with(StaticQueryRunner::new());
    let ctx = ToolContext::for_team(team(1));

    // 3 archived, 4 deleted, 5 belongs to team 2, 99 does not exist.
    for id in [3, 4, 5, 99] {
        let response = toolkit
            .dispatch(&ctx, "analyze_experiment", json!({"experiment_id": id}))
            .await
            .unwrap();
        assert_eq!(response.message, format!("Experiment {} not found.", id));
        assert_eq!(response.artifact, json!({}));
    }
}

// =============================================================================
// Faults
// =============================================================================

#[tokio::test]
async fn test_store_fault_is_reported_not_raised() {
    let toolkit =
        ExperimentToolkit::new(Arc::new(UnavailableStore), Arc::new(StaticQueryRunner::new()))
            .unwrap();
    let ctx = ToolContext::for_team(team(1));

    let search = toolkit
        .dispatch(&ctx, "search_experiments", json!({"query": "x"}))
        .await
        .unwrap();
    assert!(search.message.starts_with("Error searching experiments: "));
    assert!(search.message.contains("database is unavailable"));
    assert_eq!(search.artifact, json!([]));

    let analyze = toolkit
        .dispatch(&ctx, "analyze_experiment", json!({"experiment_id": 1}))
        .await
        .unwrap();
    assert!(analyze.message.starts_with("Error analyzing experiment: "));
    assert_eq!(analyze.artifact, json!({}));
}

// =============================================================================
// Dispatch contract
// =============================================================================

#[tokio::test]
async fn test_unknown_tool_is_not_found() {
    let toolkit = toolkit_with(StaticQueryRunner::new());
    let err = toolkit
        .dispatch(&ToolContext::for_team(team(1)), "delete_experiment", json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_bad_arguments_are_rejected() {
    let toolkit = toolkit_with(StaticQueryRunner::new());
    let ctx = ToolContext::for_team(team(1));

    let err = toolkit
        .dispatch(&ctx, "analyze_experiment", json!({"experiment_id": "two"}))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(err.to_string().contains("expected integer, got string"));

    let err = toolkit
        .dispatch(&ctx, "search_experiments", json!({}))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("missing required parameter: query"));

    let err = toolkit
        .dispatch(&ctx, "search_experiments", json!("check"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_config_limits_enabled_tools() {
    let config = ToolsConfig {
        enabled: vec!["search_experiments".to_string()],
    };
    let toolkit = ExperimentToolkit::from_config(
        &config,
        Arc::new(seeded_store()),
        Arc::new(StaticQueryRunner::new()),
    )
    .unwrap();

    assert_eq!(toolkit.catalog().list_ids(), vec!["search_experiments"]);
    let err = toolkit
        .dispatch(
            &ToolContext::for_team(team(1)),
            "analyze_experiment",
            json!({"experiment_id": 1}),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_config_rejects_unknown_tool() {
    let config = ToolsConfig {
        enabled: vec!["drop_tables".to_string()],
    };
    let err = ExperimentToolkit::from_config(
        &config,
        Arc::new(seeded_store()),
        Arc::new(StaticQueryRunner::new()),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_system_prompt_lists_tools_and_current_experiments() {
    let toolkit = toolkit_with(StaticQueryRunner::new());

    let prompt = toolkit.system_prompt(&ToolContext::for_team(team(1))).await;
    assert!(prompt.starts_with("Available tools:\n- analyze_experiment(experiment_id: integer)"));
    assert!(prompt.contains("- search_experiments(query: string)"));
    assert!(prompt.contains(
        "Current experiments available: Checkout test (ID: 2), Sign-up flow (ID: 1)"
    ));

    let anonymous = toolkit.system_prompt(&ToolContext::without_team()).await;
    assert!(anonymous.contains("Current experiments available: none"));
}
