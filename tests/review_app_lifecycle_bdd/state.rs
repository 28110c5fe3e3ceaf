//! Scenario state and runtime/server initialisation for the review app
//! lifecycle BDD tests.

use camino::Utf8PathBuf;
use review_app_deployer::{ReconcileOutcome, ReviewAppConfig, ReviewAppError};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use std::cell::RefCell;
use std::rc::Rc;
use tempfile::TempDir;
use tokio::runtime::Runtime;
use wiremock::MockServer;

/// Shared runtime wrapper that can be stored in rstest-bdd Slot.
#[derive(Clone)]
pub(crate) struct SharedRuntime(Rc<RefCell<Runtime>>);

impl SharedRuntime {
    pub(crate) fn new(runtime: Runtime) -> Self {
        Self(Rc::new(RefCell::new(runtime)))
    }

    pub(crate) fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.borrow().block_on(future)
    }
}

#[derive(ScenarioState, Default)]
pub(crate) struct LifecycleState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) github: Slot<MockServer>,
    pub(crate) heroku: Slot<MockServer>,
    pub(crate) workspace: Slot<TempDir>,
    pub(crate) outcome: Slot<ReconcileOutcome>,
    pub(crate) error: Slot<ReviewAppError>,
}

/// Ensures the runtime, both mock servers, and the workspace directory exist.
pub(crate) fn ensure_runtime_and_servers(lifecycle_state: &LifecycleState) -> SharedRuntime {
    if lifecycle_state.runtime.with_ref(|_| ()).is_none() {
        let runtime = Runtime::new()
            .unwrap_or_else(|error| panic!("failed to create Tokio runtime: {error}"));
        lifecycle_state.runtime.set(SharedRuntime::new(runtime));
    }

    let shared_runtime = lifecycle_state
        .runtime
        .get()
        .unwrap_or_else(|| panic!("runtime not initialised after set"));

    if lifecycle_state.github.with_ref(|_| ()).is_none() {
        lifecycle_state
            .github
            .set(shared_runtime.block_on(MockServer::start()));
    }
    if lifecycle_state.heroku.with_ref(|_| ()).is_none() {
        lifecycle_state
            .heroku
            .set(shared_runtime.block_on(MockServer::start()));
    }
    if lifecycle_state.workspace.with_ref(|_| ()).is_none() {
        let workspace = tempfile::tempdir()
            .unwrap_or_else(|error| panic!("failed to create workspace: {error}"));
        lifecycle_state.workspace.set(workspace);
    }

    shared_runtime
}

/// Path of `name` inside the scenario workspace.
pub(crate) fn workspace_path(lifecycle_state: &LifecycleState, name: &str) -> Utf8PathBuf {
    lifecycle_state
        .workspace
        .with_ref(|workspace| {
            Utf8PathBuf::from_path_buf(workspace.path().join(name))
                .unwrap_or_else(|path| panic!("workspace path is not UTF-8: {}", path.display()))
        })
        .unwrap_or_else(|| panic!("workspace not initialised"))
}

/// Writes `payload` as the event file and runs the step against the mocks.
pub(crate) fn run_step(
    lifecycle_state: &LifecycleState,
    event_name: &str,
    payload: &serde_json::Value,
) {
    let runtime = ensure_runtime_and_servers(lifecycle_state);

    let event_path = workspace_path(lifecycle_state, "event.json");
    std::fs::write(&event_path, payload.to_string())
        .unwrap_or_else(|error| panic!("failed to write event payload: {error}"));

    let github_url = lifecycle_state
        .github
        .with_ref(MockServer::uri)
        .unwrap_or_else(|| panic!("GitHub mock server not initialised"));
    let heroku_url = lifecycle_state
        .heroku
        .with_ref(MockServer::uri)
        .unwrap_or_else(|| panic!("Heroku mock server not initialised"));

    let config = ReviewAppConfig {
        pipeline_id: Some("pipeline-123".to_owned()),
        heroku_api_token: Some("heroku-token".to_owned()),
        github_token: Some("github-token".to_owned()),
        github_pa_token: Some("personal-token".to_owned()),
        collaborator_permission: Some("triage,write,maintain,admin".to_owned()),
        label_name: Some("review-app".to_owned()),
        event_name: Some(event_name.to_owned()),
        event_path: Some(event_path.to_string()),
        actor: Some("hubot".to_owned()),
        output_path: Some(workspace_path(lifecycle_state, "output").to_string()),
        github_api_url: Some(github_url),
        heroku_api_url: Some(heroku_url),
        request_timeout_seconds: 5,
    };

    match runtime.block_on(review_app_deployer::run(&config)) {
        Ok(outcome) => {
            drop(lifecycle_state.error.take());
            lifecycle_state.outcome.set(outcome);
        }
        Err(error) => {
            drop(lifecycle_state.outcome.take());
            lifecycle_state.error.set(error);
        }
    }
}

/// Contents of the step output file, empty when nothing was published.
pub(crate) fn published_outputs(lifecycle_state: &LifecycleState) -> String {
    std::fs::read_to_string(workspace_path(lifecycle_state, "output")).unwrap_or_default()
}
