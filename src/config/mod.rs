//! Step configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in defaults
//! 2. **Configuration file** – `.review-app.toml` in the current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `REVIEW_APP_*`
//! 4. **Command-line arguments** – `--pipeline-id`, `--label-name`, ...
//!
//! Settings that GitHub Actions workflows conventionally pass through
//! unprefixed variables (`HEROKU_PIPELINE_ID`, `GITHUB_TOKEN`,
//! `GITHUB_EVENT_PATH`, ...) fall back to those variables when no layer sets
//! them. The trigger label is read from `REVIEW_APP_LABEL_NAME`, which is both
//! the prefixed and the conventional name.
//!
//! # Configuration File
//!
//! ```toml
//! pipeline_id = "5bd5a4c2-0000-0000-0000-000000000000"
//! collaborator_permission = "write,maintain,admin"
//! label_name = "deploy-preview"
//! request_timeout_seconds = 60
//! ```

use std::env;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::credentials::ApiToken;
use crate::error::ReviewAppError;
use crate::github::AllowedPermissions;
use crate::heroku::PipelineId;
use crate::reconciler::REVIEW_APP_LABEL;

/// Default GitHub REST API base.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Default Heroku Platform API base.
pub const DEFAULT_HEROKU_API_URL: &str = "https://api.heroku.com";

const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Configuration for one run of the review app step.
///
/// # Environment Variables
///
/// - `REVIEW_APP_PIPELINE_ID` or `HEROKU_PIPELINE_ID`: Heroku pipeline
/// - `REVIEW_APP_HEROKU_API_TOKEN` or `HEROKU_API_TOKEN`: Heroku API token
/// - `REVIEW_APP_GITHUB_TOKEN` or `GITHUB_TOKEN`: token for GitHub API calls
/// - `REVIEW_APP_GITHUB_PA_TOKEN` or `GITHUB_PA_TOKEN`: personal access token
///   embedded in the source tarball URL
/// - `REVIEW_APP_COLLABORATOR_PERMISSION` or `COLLABORATOR_PERMISSION`:
///   comma-separated permission levels allowed to deploy
/// - `REVIEW_APP_LABEL_NAME`: label that triggers a deployment
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use review_app_deployer::ReviewAppConfig;
///
/// let config = ReviewAppConfig::load().expect("failed to load configuration");
/// let pipeline = config.resolve_pipeline_id().expect("pipeline required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "REVIEW_APP",
    discovery(
        dotfile_name = ".review-app.toml",
        config_file_name = "review-app.toml",
        app_name = "review-app"
    )
)]
pub struct ReviewAppConfig {
    /// Heroku pipeline whose review apps are managed.
    ///
    /// Can be provided via:
    /// - CLI: `--pipeline-id <ID>` or `-p <ID>`
    /// - Environment: `REVIEW_APP_PIPELINE_ID` or `HEROKU_PIPELINE_ID`
    /// - Config file: `pipeline_id = "..."`
    #[ortho_config(cli_short = 'p')]
    pub pipeline_id: Option<String>,

    /// Heroku Platform API token.
    #[ortho_config()]
    pub heroku_api_token: Option<String>,

    /// Token used for the permission lookup and label calls.
    #[ortho_config()]
    pub github_token: Option<String>,

    /// Personal access token embedded in the tarball URL Heroku downloads.
    ///
    /// The implicit workflow token cannot be used here because Heroku
    /// fetches the tarball after the job has finished.
    #[ortho_config()]
    pub github_pa_token: Option<String>,

    /// Comma-separated permission levels allowed to deploy.
    ///
    /// Defaults to `triage,write,maintain,admin` when unset or blank.
    #[ortho_config()]
    pub collaborator_permission: Option<String>,

    /// Label whose addition triggers a deployment (default `review-app`).
    ///
    /// Can be provided via:
    /// - CLI: `--label-name <NAME>` or `-l <NAME>`
    /// - Environment: `REVIEW_APP_LABEL_NAME`
    /// - Config file: `label_name = "..."`
    #[ortho_config(cli_short = 'l')]
    pub label_name: Option<String>,

    /// Event name (`pull_request` or `pull_request_target`), defaulting to
    /// `GITHUB_EVENT_NAME`.
    #[ortho_config()]
    pub event_name: Option<String>,

    /// Path of the webhook payload, defaulting to `GITHUB_EVENT_PATH`.
    #[ortho_config()]
    pub event_path: Option<String>,

    /// Login whose permission is checked, defaulting to `GITHUB_ACTOR` and
    /// then to the payload's sender.
    #[ortho_config()]
    pub actor: Option<String>,

    /// File receiving step outputs, defaulting to `GITHUB_OUTPUT`.
    #[ortho_config()]
    pub output_path: Option<String>,

    /// GitHub REST API base, defaulting to `GITHUB_API_URL` and then to
    /// `https://api.github.com`.
    #[ortho_config()]
    pub github_api_url: Option<String>,

    /// Heroku Platform API base (default `https://api.heroku.com`).
    #[ortho_config()]
    pub heroku_api_url: Option<String>,

    /// Timeout applied to each Heroku request, in seconds (default 30).
    ///
    /// Zero selects the default.
    #[ortho_config()]
    pub request_timeout_seconds: u64,
}

impl Default for ReviewAppConfig {
    fn default() -> Self {
        Self {
            pipeline_id: None,
            heroku_api_token: None,
            github_token: None,
            github_pa_token: None,
            collaborator_permission: None,
            label_name: None,
            event_name: None,
            event_path: None,
            actor: None,
            output_path: None,
            github_api_url: None,
            heroku_api_url: None,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        }
    }
}

/// Returns the configured value, or the legacy variable when unset.
///
/// Blank values from either source count as unset.
fn or_legacy_env(value: Option<&String>, legacy: &str) -> Option<String> {
    value
        .filter(|configured| !configured.trim().is_empty())
        .cloned()
        .or_else(|| env::var(legacy).ok())
        .filter(|resolved| !resolved.trim().is_empty())
}

impl ReviewAppConfig {
    /// Resolves the Heroku pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::MissingSetting`] when no source provides a
    /// value.
    pub fn resolve_pipeline_id(&self) -> Result<PipelineId, ReviewAppError> {
        let value = or_legacy_env(self.pipeline_id.as_ref(), "HEROKU_PIPELINE_ID").ok_or(
            ReviewAppError::MissingSetting {
                name: "pipeline id (HEROKU_PIPELINE_ID)",
            },
        )?;
        PipelineId::new(&value)
    }

    /// Resolves the Heroku API token.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::MissingSetting`] when no source provides a
    /// value.
    pub fn resolve_heroku_token(&self) -> Result<ApiToken, ReviewAppError> {
        Self::resolve_token(
            self.heroku_api_token.as_ref(),
            "HEROKU_API_TOKEN",
            "Heroku API token (HEROKU_API_TOKEN)",
        )
    }

    /// Resolves the token used for GitHub API calls.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::MissingSetting`] when no source provides a
    /// value.
    pub fn resolve_github_token(&self) -> Result<ApiToken, ReviewAppError> {
        Self::resolve_token(
            self.github_token.as_ref(),
            "GITHUB_TOKEN",
            "GitHub token (GITHUB_TOKEN)",
        )
    }

    /// Resolves the personal access token embedded in the tarball URL.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::MissingSetting`] when no source provides a
    /// value.
    pub fn resolve_archive_token(&self) -> Result<ApiToken, ReviewAppError> {
        Self::resolve_token(
            self.github_pa_token.as_ref(),
            "GITHUB_PA_TOKEN",
            "GitHub personal access token (GITHUB_PA_TOKEN)",
        )
    }

    fn resolve_token(
        value: Option<&String>,
        legacy: &str,
        setting: &'static str,
    ) -> Result<ApiToken, ReviewAppError> {
        let token = or_legacy_env(value, legacy)
            .ok_or(ReviewAppError::MissingSetting { name: setting })?;
        ApiToken::new(setting, token)
    }

    /// Resolves the permission levels allowed to deploy.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::Configuration`] when the list names an
    /// unknown level.
    pub fn resolve_allowed_permissions(&self) -> Result<AllowedPermissions, ReviewAppError> {
        or_legacy_env(
            self.collaborator_permission.as_ref(),
            "COLLABORATOR_PERMISSION",
        )
        .map_or_else(|| Ok(AllowedPermissions::default()), |list| {
            AllowedPermissions::parse(&list)
        })
    }

    /// Returns the trigger label, defaulting to `review-app`.
    #[must_use]
    pub fn trigger_label(&self) -> &str {
        self.label_name
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .unwrap_or(REVIEW_APP_LABEL)
    }

    /// Resolves the event name.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::MissingSetting`] when neither the
    /// configuration nor `GITHUB_EVENT_NAME` provides a value.
    pub fn resolve_event_name(&self) -> Result<String, ReviewAppError> {
        or_legacy_env(self.event_name.as_ref(), "GITHUB_EVENT_NAME").ok_or(
            ReviewAppError::MissingSetting {
                name: "event name (GITHUB_EVENT_NAME)",
            },
        )
    }

    /// Resolves the webhook payload path.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::MissingSetting`] when neither the
    /// configuration nor `GITHUB_EVENT_PATH` provides a value.
    pub fn resolve_event_path(&self) -> Result<Utf8PathBuf, ReviewAppError> {
        or_legacy_env(self.event_path.as_ref(), "GITHUB_EVENT_PATH")
            .map(Utf8PathBuf::from)
            .ok_or(ReviewAppError::MissingSetting {
                name: "event payload path (GITHUB_EVENT_PATH)",
            })
    }

    /// Resolves the actor from configuration or `GITHUB_ACTOR`.
    #[must_use]
    pub fn resolve_actor(&self) -> Option<String> {
        or_legacy_env(self.actor.as_ref(), "GITHUB_ACTOR")
    }

    /// Resolves the step output file from configuration or `GITHUB_OUTPUT`.
    #[must_use]
    pub fn resolve_output_path(&self) -> Option<Utf8PathBuf> {
        or_legacy_env(self.output_path.as_ref(), "GITHUB_OUTPUT").map(Utf8PathBuf::from)
    }

    /// Resolves the GitHub API base.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::InvalidUrl`] when the value does not parse.
    pub fn resolve_github_api_url(&self) -> Result<Url, ReviewAppError> {
        let raw = or_legacy_env(self.github_api_url.as_ref(), "GITHUB_API_URL")
            .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_owned());
        Url::parse(&raw).map_err(|error| ReviewAppError::InvalidUrl(format!("{raw}: {error}")))
    }

    /// Returns the Heroku API base.
    #[must_use]
    pub fn heroku_api_url(&self) -> &str {
        self.heroku_api_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_HEROKU_API_URL)
    }

    /// Returns the per-request timeout for Heroku calls.
    ///
    /// Zero falls back to the default.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        if self.request_timeout_seconds == 0 {
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS)
        } else {
            Duration::from_secs(self.request_timeout_seconds)
        }
    }
}

#[cfg(test)]
mod tests;
