//! Payload and request helpers for the review app lifecycle BDD tests.

use serde_json::{Value, json};
use wiremock::MockServer;

use super::state::SharedRuntime;

pub(crate) const GITHUB_PERMISSION_PATH: &str =
    "/repos/octo/widgets/collaborators/hubot/permission";
pub(crate) const GITHUB_LABELS_PATH: &str = "/repos/octo/widgets/issues/42/labels";
pub(crate) const HEROKU_LIST_PATH: &str = "/pipelines/pipeline-123/review-apps";
pub(crate) const HEROKU_CREATE_PATH: &str = "/review-apps";

/// Where the head branch of the pull request lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PullRequestOrigin {
    Upstream,
    Fork,
}

/// Builds a webhook payload for pull request 42 on `octo/widgets`.
pub(crate) fn event_payload(
    action: &str,
    label: Option<&str>,
    origin: PullRequestOrigin,
) -> Value {
    let head_repo = match origin {
        PullRequestOrigin::Upstream => json!({
            "id": 9001,
            "name": "widgets",
            "html_url": "https://github.com/octo/widgets",
            "fork": false,
            "owner": { "login": "octo" }
        }),
        PullRequestOrigin::Fork => json!({
            "id": 7007,
            "name": "widgets",
            "html_url": "https://github.com/contributor/widgets",
            "fork": true,
            "owner": { "login": "contributor" }
        }),
    };

    let mut payload = json!({
        "action": action,
        "number": 42,
        "pull_request": {
            "number": 42,
            "head": { "ref": "feature", "sha": "0123abcd", "repo": head_repo }
        },
        "repository": {
            "id": 9001,
            "name": "widgets",
            "html_url": "https://github.com/octo/widgets",
            "owner": { "login": "octo" }
        },
        "sender": { "login": "hubot" }
    });
    if let (Some(name), Some(fields)) = (label, payload.as_object_mut()) {
        fields.insert("label".to_owned(), json!({ "name": name }));
    }
    payload
}

/// Requests `server` received for `http_method` on `request_path`.
pub(crate) fn requests_to(
    runtime: &SharedRuntime,
    server: &MockServer,
    http_method: &str,
    request_path: &str,
) -> Vec<wiremock::Request> {
    runtime
        .block_on(server.received_requests())
        .unwrap_or_default()
        .into_iter()
        .filter(|request| {
            request.method.as_str() == http_method && request.url.path() == request_path
        })
        .collect()
}
