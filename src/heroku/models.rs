//! Review app models exchanged with the Heroku Platform API.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ReviewAppError;

/// Heroku pipeline identifier (UUID or name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PipelineId(String);

impl PipelineId {
    /// Wraps a non-blank pipeline identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::MissingSetting`] when the value is blank.
    pub fn new(value: &str) -> Result<Self, ReviewAppError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ReviewAppError::MissingSetting {
                name: "pipeline id (HEROKU_PIPELINE_ID)",
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the identifier.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Identifier Heroku assigns a review app.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ReviewAppId(String);

impl ReviewAppId {
    /// Wraps an identifier returned by Heroku.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the identifier.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ReviewAppId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Review app as listed for a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewApp {
    /// Review app identifier.
    pub id: ReviewAppId,
    /// Pull request the app was built for; Heroku reports null for apps
    /// created from a branch.
    pub pr_number: Option<u64>,
}

/// Tarball URL with credentials embedded in its userinfo.
///
/// `Debug` and `Display` drop the password so the URL can be logged; only
/// serialisation emits the full value.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SourceArchiveUrl(Url);

impl SourceArchiveUrl {
    /// Wraps a fully built archive URL.
    #[must_use]
    pub const fn new(url: Url) -> Self {
        Self(url)
    }

    /// Full URL including credentials.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// URL with the password removed.
    #[must_use]
    pub fn redacted(&self) -> String {
        let mut url = self.0.clone();
        if url.set_password(None).is_err() {
            return "<redacted>".to_owned();
        }
        url.to_string()
    }
}

impl fmt::Debug for SourceArchiveUrl {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("SourceArchiveUrl")
            .field(&self.redacted())
            .finish()
    }
}

impl fmt::Display for SourceArchiveUrl {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.redacted())
    }
}

/// Source tarball Heroku builds the review app from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceBlob {
    /// Tarball location.
    pub url: SourceArchiveUrl,
    /// Commit SHA the tarball corresponds to.
    pub version: String,
}

/// Body of `POST /review-apps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateReviewAppRequest {
    /// Head branch the app deploys.
    pub branch: String,
    /// Pipeline the app belongs to.
    pub pipeline: PipelineId,
    /// Source tarball and version.
    pub source_blob: SourceBlob,
    /// Head repository id when the pull request comes from a fork.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fork_repo_id: Option<u64>,
    /// Pull request number.
    pub pr_number: u64,
    /// Config vars set on the new app.
    pub environment: BTreeMap<String, String>,
}

/// Result of a create call that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Heroku accepted the request and is building a new app.
    Created,
    /// Heroku answered 409: an app for this pull request already exists.
    AlreadyExists,
}
