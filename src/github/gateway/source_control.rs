//! Octocrab implementation of the source-control gateway.

use async_trait::async_trait;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};

use crate::credentials::ApiToken;
use crate::error::ReviewAppError;
use crate::github::permission::CollaboratorPermission;
use crate::github::repository::{PullRequestNumber, RepositoryRef};

use super::SourceControlGateway;
use super::client::build_octocrab_client;
use super::error_mapping::map_octocrab_error;

/// Octocrab-backed gateway.
pub struct OctocrabSourceControlGateway {
    client: Octocrab,
}

impl OctocrabSourceControlGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token and API base URL.
    ///
    /// # Errors
    ///
    /// Returns `ReviewAppError::InvalidUrl` when the base URI cannot be parsed
    /// or `ReviewAppError::GitHub` when Octocrab fails to construct a client.
    pub fn for_token(token: &ApiToken, api_base: &str) -> Result<Self, ReviewAppError> {
        let octocrab = build_octocrab_client(token, api_base)?;
        Ok(Self::new(octocrab))
    }
}

#[derive(Debug, Deserialize)]
struct ApiCollaboratorPermission {
    permission: String,
}

#[derive(Debug, Serialize)]
struct AddLabelsBody<'a> {
    labels: &'a [String],
}

#[async_trait]
impl SourceControlGateway for OctocrabSourceControlGateway {
    async fn collaborator_permission(
        &self,
        repository: &RepositoryRef,
        username: &str,
    ) -> Result<CollaboratorPermission, ReviewAppError> {
        let response = self
            .client
            .get::<ApiCollaboratorPermission, _, _>(
                repository.collaborator_permission_path(username),
                None::<&()>,
            )
            .await
            .map_err(|error| map_octocrab_error("collaborator permission", &error))?;

        response
            .permission
            .parse()
            .map_err(|error| ReviewAppError::GitHub {
                message: format!("collaborator permission for {username}: {error}"),
            })
    }

    async fn add_labels(
        &self,
        repository: &RepositoryRef,
        number: PullRequestNumber,
        labels: &[String],
    ) -> Result<(), ReviewAppError> {
        let body = AddLabelsBody { labels };
        self.client
            .post::<_, serde_json::Value>(repository.issue_labels_path(number), Some(&body))
            .await
            .map(drop)
            .map_err(|error| map_octocrab_error("add labels", &error))
    }
}
