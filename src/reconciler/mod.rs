//! Review app lifecycle reconciliation.
//!
//! Every invocation first removes the review app already attached to the
//! pull request, then checks that the actor is a collaborator, classifies the
//! action, applies the fork guard, and finally requests a fresh app. A 409
//! from the create call means Heroku still holds an app for the pull request
//! and is reported as [`DeploymentStatus::Existing`].

mod source_archive;
mod trigger;

pub use source_archive::tarball_url;
pub use trigger::Trigger;

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info};
use url::Url;

use crate::credentials::ApiToken;
use crate::error::ReviewAppError;
use crate::github::{
    AllowedPermissions, CollaboratorPermission, PullRequestEvent, SourceControlGateway,
};
use crate::heroku::{
    CreateOutcome, CreateReviewAppRequest, PipelineId, PlatformGateway, ReviewApp, SourceBlob,
};

/// Label added to pull requests that receive a review app.
pub const REVIEW_APP_LABEL: &str = "review-app";

/// Config var carrying the head repository URL into the review app.
pub const GIT_REPO_URL_VAR: &str = "GIT_REPO_URL";

/// Value published as the step's `status` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentStatus {
    /// A new review app was requested, or none was needed.
    New,
    /// Heroku reported that an app for the pull request already exists.
    Existing,
}

impl DeploymentStatus {
    /// Output value as written for the workflow.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Existing => "existing",
        }
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// What a completed run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconciliationDecision {
    /// An existing review app for the pull request was deleted.
    pub should_delete: bool,
    /// A create request was sent.
    pub should_create: bool,
    /// Status to publish.
    pub status: DeploymentStatus,
}

/// Why a run stopped early without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The actor's permission level is not in the allowed set.
    NotCollaborator {
        /// Level GitHub reported for the actor.
        permission: CollaboratorPermission,
    },
    /// The pull request comes from a fork and the event carries no secrets.
    ForkWithoutSecrets,
}

/// Result of one reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The run stopped at a gate; no status is published.
    Skipped(SkipReason),
    /// The run reached the end and publishes a status.
    Completed(ReconciliationDecision),
}

/// Inputs the reconciler needs besides the event.
#[derive(Debug, Clone)]
pub struct ReconcilerSettings {
    /// Pipeline whose review apps are managed.
    pub pipeline: PipelineId,
    /// Levels allowed to trigger deployments.
    pub allowed_permissions: AllowedPermissions,
    /// Label whose addition triggers a deployment.
    pub trigger_label: String,
    /// Login whose permission is checked.
    pub actor: String,
    /// GitHub API base embedded in the tarball URL.
    pub archive_api_base: Url,
    /// Personal access token embedded in the tarball URL.
    pub archive_token: ApiToken,
}

/// Drives the delete, gate, and create sequence against both gateways.
pub struct ReviewAppReconciler<'a, SourceControl, Platform>
where
    SourceControl: SourceControlGateway,
    Platform: PlatformGateway,
{
    source_control: &'a SourceControl,
    platform: &'a Platform,
    settings: &'a ReconcilerSettings,
}

impl<'a, SourceControl, Platform> ReviewAppReconciler<'a, SourceControl, Platform>
where
    SourceControl: SourceControlGateway,
    Platform: PlatformGateway,
{
    /// Create a reconciler over the provided gateways.
    #[must_use]
    pub const fn new(
        source_control: &'a SourceControl,
        platform: &'a Platform,
        settings: &'a ReconcilerSettings,
    ) -> Self {
        Self {
            source_control,
            platform,
            settings,
        }
    }

    /// Reconcile the review app for `event`.
    ///
    /// # Errors
    ///
    /// Propagates every gateway failure except the create conflict, which is
    /// reported as [`DeploymentStatus::Existing`].
    pub async fn reconcile(
        &self,
        event: &PullRequestEvent,
    ) -> Result<ReconcileOutcome, ReviewAppError> {
        let should_delete = self.remove_existing(event).await?;

        let permission = self
            .source_control
            .collaborator_permission(&event.base, &self.settings.actor)
            .await?;
        if !self.settings.allowed_permissions.contains(permission) {
            info!(
                actor = %self.settings.actor,
                %permission,
                "user is not a collaborator, skipping"
            );
            return Ok(ReconcileOutcome::Skipped(SkipReason::NotCollaborator {
                permission,
            }));
        }
        info!(actor = %self.settings.actor, %permission, "user is a collaborator");

        let trigger = Trigger::classify(&event.action, &self.settings.trigger_label);
        debug!(?trigger, action = ?event.action, "classified pull request action");

        if trigger.adds_label() {
            self.source_control
                .add_labels(&event.base, event.number, &[REVIEW_APP_LABEL.to_owned()])
                .await?;
            info!(label = REVIEW_APP_LABEL, "labelled pull request");
        }

        if !trigger.creates_app() {
            info!(?trigger, "action does not request a review app");
            return Ok(ReconcileOutcome::Completed(ReconciliationDecision {
                should_delete,
                should_create: false,
                status: DeploymentStatus::New,
            }));
        }

        if event.is_fork() && !event.source.exposes_secrets_to_forks() {
            info!(
                event = event.source.as_str(),
                "fork detected; use the pull_request_target event to deploy forks"
            );
            return Ok(ReconcileOutcome::Skipped(SkipReason::ForkWithoutSecrets));
        }

        let status = self.create(event).await?;
        Ok(ReconcileOutcome::Completed(ReconciliationDecision {
            should_delete,
            should_create: true,
            status,
        }))
    }

    async fn remove_existing(&self, event: &PullRequestEvent) -> Result<bool, ReviewAppError> {
        info!(pipeline = self.settings.pipeline.as_str(), "listing review apps");
        let apps = self
            .platform
            .list_review_apps(&self.settings.pipeline)
            .await?;

        let Some(app) = find_review_app(&apps, event.number.get()) else {
            info!(pr = %event.number, "did not find review app for pull request");
            return Ok(false);
        };

        info!(id = %app.id, pr = %event.number, "deleting existing review app");
        self.platform.delete_review_app(&app.id).await?;
        info!(id = %app.id, "review app deleted");
        Ok(true)
    }

    async fn create(&self, event: &PullRequestEvent) -> Result<DeploymentStatus, ReviewAppError> {
        let request = self.create_request(event)?;
        debug!(?request, "deploy info");

        info!(branch = %request.branch, "creating review app");
        match self.platform.create_review_app(&request).await? {
            CreateOutcome::Created => {
                info!("created review app");
                Ok(DeploymentStatus::New)
            }
            CreateOutcome::AlreadyExists => {
                info!("review app is already created");
                Ok(DeploymentStatus::Existing)
            }
        }
    }

    fn create_request(
        &self,
        event: &PullRequestEvent,
    ) -> Result<CreateReviewAppRequest, ReviewAppError> {
        let url = tarball_url(
            &self.settings.archive_api_base,
            &event.head.repository,
            &event.head_branch,
            &self.settings.archive_token,
        )?;

        Ok(CreateReviewAppRequest {
            branch: event.head_branch.clone(),
            pipeline: self.settings.pipeline.clone(),
            source_blob: SourceBlob {
                url,
                version: event.head_sha.clone(),
            },
            fork_repo_id: event.fork_repo_id(),
            pr_number: event.number.get(),
            environment: BTreeMap::from([(
                GIT_REPO_URL_VAR.to_owned(),
                event.head.html_url.clone(),
            )]),
        })
    }
}

/// Returns the first review app built for `pr_number`.
#[must_use]
pub fn find_review_app(apps: &[ReviewApp], pr_number: u64) -> Option<&ReviewApp> {
    apps.iter().find(|app| app.pr_number == Some(pr_number))
}
