//! Pull request webhook intake.
//!
//! The runner hands the step an event name and the path of a JSON payload.
//! Types prefixed with `Api` are private deserialisation targets that convert
//! into the public [`PullRequestEvent`] once the payload has been validated.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::Deserialize;

use super::repository::{PullRequestNumber, RepositoryName, RepositoryOwner, RepositoryRef};
use crate::error::ReviewAppError;

/// Webhook event family that triggered the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    /// Runs in the context of the head branch; forks receive no secrets.
    PullRequest,
    /// Runs in the context of the base branch with secrets available.
    PullRequestTarget,
}

impl EventSource {
    /// Maps the runner's event name onto a supported source.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::UnsupportedEvent`] for any other event.
    pub fn from_event_name(name: &str) -> Result<Self, ReviewAppError> {
        match name.trim() {
            "pull_request" => Ok(Self::PullRequest),
            "pull_request_target" => Ok(Self::PullRequestTarget),
            other => Err(ReviewAppError::UnsupportedEvent {
                event: other.to_owned(),
            }),
        }
    }

    /// Event name as GitHub spells it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PullRequest => "pull_request",
            Self::PullRequestTarget => "pull_request_target",
        }
    }

    /// Whether workflows for this event can read repository secrets when the
    /// pull request comes from a fork.
    #[must_use]
    pub const fn exposes_secrets_to_forks(self) -> bool {
        matches!(self, Self::PullRequestTarget)
    }
}

/// Activity type of a pull request event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestAction {
    /// The pull request was opened.
    Opened,
    /// A closed pull request was reopened.
    Reopened,
    /// New commits were pushed to the head branch.
    Synchronize,
    /// A label was added.
    Labeled {
        /// Name of the label that was added.
        label: String,
    },
    /// The pull request was closed or merged.
    Closed,
    /// Any other activity type, kept verbatim.
    Other(String),
}

impl PullRequestAction {
    fn from_api(action: &str, label: Option<ApiLabel>) -> Result<Self, ReviewAppError> {
        let parsed = match action {
            "opened" => Self::Opened,
            "reopened" => Self::Reopened,
            "synchronize" => Self::Synchronize,
            "closed" => Self::Closed,
            "labeled" => {
                let name = label.and_then(|api_label| api_label.name).ok_or_else(|| {
                    ReviewAppError::InvalidEvent {
                        message: "labeled event is missing label.name".to_owned(),
                    }
                })?;
                Self::Labeled { label: name }
            }
            other => Self::Other(other.to_owned()),
        };
        Ok(parsed)
    }
}

/// Repository that holds the pull request's head branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadRepository {
    /// Owner and name of the head repository.
    pub repository: RepositoryRef,
    /// Numeric GitHub repository id.
    pub id: u64,
    /// Browser URL of the head repository.
    pub html_url: String,
    /// Whether the head repository is a fork of the base repository.
    pub fork: bool,
}

/// A validated pull request event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    /// What happened to the pull request.
    pub action: PullRequestAction,
    /// Which event family delivered it.
    pub source: EventSource,
    /// Pull request number.
    pub number: PullRequestNumber,
    /// Head branch name.
    pub head_branch: String,
    /// Head commit SHA.
    pub head_sha: String,
    /// Repository the head branch lives in.
    pub head: HeadRepository,
    /// Repository the pull request targets.
    pub base: RepositoryRef,
    /// Login of the user who triggered the event, if the payload names one.
    pub sender: Option<String>,
}

impl PullRequestEvent {
    /// Reads and validates the payload file written by the runner.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::Io`] when the file cannot be read and
    /// [`ReviewAppError::InvalidEvent`] when its contents are not a pull
    /// request payload.
    pub fn load(source: EventSource, path: &Utf8Path) -> Result<Self, ReviewAppError> {
        let parent = match path.parent() {
            Some(dir) if !dir.as_str().is_empty() => dir,
            _ => Utf8Path::new("."),
        };
        let file_name = path.file_name().ok_or_else(|| ReviewAppError::Io {
            message: format!("invalid event path '{path}': no file name"),
        })?;

        let payload = Dir::open_ambient_dir(parent, ambient_authority())
            .and_then(|dir| dir.read_to_string(file_name))
            .map_err(|error| ReviewAppError::Io {
                message: format!("failed to read event payload '{path}': {error}"),
            })?;

        Self::from_payload(source, &payload)
    }

    /// Parses a JSON webhook payload.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::InvalidEvent`] when the payload is not valid
    /// JSON, lacks the pull request, or has no head repository.
    pub fn from_payload(source: EventSource, payload: &str) -> Result<Self, ReviewAppError> {
        let api: ApiEventPayload =
            serde_json::from_str(payload).map_err(|error| ReviewAppError::InvalidEvent {
                message: format!("payload is not a pull request event: {error}"),
            })?;
        Self::from_api(source, api)
    }

    fn from_api(source: EventSource, api: ApiEventPayload) -> Result<Self, ReviewAppError> {
        let pull_request = api.pull_request.ok_or_else(|| ReviewAppError::InvalidEvent {
            message: "payload has no pull_request object".to_owned(),
        })?;
        let head_repo = pull_request
            .head
            .repo
            .ok_or_else(|| ReviewAppError::InvalidEvent {
                message: "pull_request.head.repo is null; the head repository was deleted"
                    .to_owned(),
            })?;

        let head = HeadRepository {
            repository: head_repo.reference()?,
            id: head_repo.id,
            html_url: head_repo.html_url,
            fork: head_repo.fork,
        };

        Ok(Self {
            action: PullRequestAction::from_api(&api.action, api.label)?,
            source,
            number: PullRequestNumber::new(pull_request.number)?,
            head_branch: pull_request.head.branch,
            head_sha: pull_request.head.sha,
            head,
            base: api.repository.reference()?,
            sender: api.sender.map(|user| user.login),
        })
    }

    /// Whether the head branch lives in a fork.
    #[must_use]
    pub const fn is_fork(&self) -> bool {
        self.head.fork
    }

    /// Head repository id, reported only for forks.
    #[must_use]
    pub const fn fork_repo_id(&self) -> Option<u64> {
        if self.head.fork {
            Some(self.head.id)
        } else {
            None
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiEventPayload {
    action: String,
    pull_request: Option<ApiPullRequest>,
    label: Option<ApiLabel>,
    repository: ApiRepository,
    sender: Option<ApiUser>,
}

#[derive(Debug, Deserialize)]
struct ApiPullRequest {
    number: u64,
    head: ApiHead,
}

#[derive(Debug, Deserialize)]
struct ApiHead {
    #[serde(rename = "ref")]
    branch: String,
    sha: String,
    repo: Option<ApiRepository>,
}

#[derive(Debug, Deserialize)]
struct ApiRepository {
    #[serde(default)]
    id: u64,
    name: String,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    fork: bool,
    owner: ApiUser,
}

impl ApiRepository {
    fn reference(&self) -> Result<RepositoryRef, ReviewAppError> {
        Ok(RepositoryRef::new(
            RepositoryOwner::new(&self.owner.login)?,
            RepositoryName::new(&self.name)?,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ApiLabel {
    name: Option<String>,
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
