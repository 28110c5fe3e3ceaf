//! Support modules for the review app lifecycle BDD tests.

pub(crate) mod harness;
pub(crate) mod state;

pub(crate) use harness::{
    GITHUB_LABELS_PATH, GITHUB_PERMISSION_PATH, HEROKU_CREATE_PATH, HEROKU_LIST_PATH,
    PullRequestOrigin, event_payload, requests_to,
};
pub(crate) use state::{LifecycleState, ensure_runtime_and_servers, published_outputs, run_step};
