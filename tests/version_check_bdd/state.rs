//! Scenario state and check execution for the version check BDD tests.

use pullwatch::{CheckError, CheckRequest, OctocrabGateway, SourceConfig, Version, VersionCheck};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use serde_json::json;
use wiremock::MockServer;

use super::harness::committed_at;
use super::runtime::{SharedRuntime, ensure_runtime_and_server};

#[derive(ScenarioState, Default)]
pub(crate) struct CheckState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) source: Slot<SourceConfig>,
    pub(crate) previous: Slot<u64>,
    pub(crate) result: Slot<Vec<Version>>,
    pub(crate) error: Slot<CheckError>,
}

/// Returns the scenario runtime, starting it and the mock server if needed.
pub(crate) fn server_runtime(check_state: &CheckState) -> SharedRuntime {
    ensure_runtime_and_server(&check_state.runtime, &check_state.server)
        .unwrap_or_else(|error| panic!("failed to start test runtime: {error}"))
}

/// Applies `change` to the scenario's source block.
pub(crate) fn update_source(check_state: &CheckState, change: impl FnOnce(&mut SourceConfig)) {
    let mut source = check_state.source.take().unwrap_or_default();
    change(&mut source);
    check_state.source.set(source);
}

fn request_payload(check_state: &CheckState, server_url: &str) -> String {
    let source = check_state.source.get().unwrap_or_default();
    let version = check_state.previous.get().map(|number| {
        json!({
            "pr": number.to_string(),
            "commit": format!("sha{number}"),
            "committed": committed_at(number),
            "approved_review_count": "0",
            "state": "OPEN"
        })
    });
    json!({
        "source": {
            "repository": "owner/repo",
            "access_token": "valid-token",
            "v3_endpoint": format!("{server_url}/api/v3"),
            "v4_endpoint": format!("{server_url}/api/graphql"),
            "paths": source.paths,
            "ignore_paths": source.ignore_paths,
            "page": { "max_retries": 1, "delay_between_pages": 1 }
        },
        "version": version
    })
    .to_string()
}

/// Runs one check against the mock server, decoding the request the way the
/// binary does.
pub(crate) fn run_check(check_state: &CheckState) -> Result<Vec<Version>, CheckError> {
    let runtime = server_runtime(check_state);
    let server_url = check_state
        .server
        .with_ref(MockServer::uri)
        .unwrap_or_else(|| panic!("mock server not initialised"));

    let payload = request_payload(check_state, &server_url);
    let request = CheckRequest::from_json(&payload)?.validate()?;

    runtime.block_on(async {
        let gateway = OctocrabGateway::for_source(&request.source)
            .map_err(|source| CheckError::Client { source })?;
        VersionCheck::new(&gateway).run(&request).await
    })
}
