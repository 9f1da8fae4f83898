//! Tracing setup installs a process-global subscriber, so it runs in its own
//! test binary away from the `traced_test` assertions in the library tests.

use experiment_tools::observability::init_tracing;
use experiment_tools::types::ObservabilityConfig;

#[test]
fn init_tracing_is_idempotent() {
    let config = ObservabilityConfig::default();
    init_tracing(&config);
    init_tracing(&ObservabilityConfig {
        json_logs: true,
        ..config
    });

    tracing::error!(team_id = 1, "still routed after repeated init");
}
