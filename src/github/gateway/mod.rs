//! Gateways for the GitHub calls the reconciler makes.
//!
//! The trait keeps the reconciler independent of Octocrab so that tests can
//! substitute a mock, while [`OctocrabSourceControlGateway`] performs the real
//! HTTP requests.

mod client;
mod error_mapping;
mod source_control;

pub use source_control::OctocrabSourceControlGateway;

use async_trait::async_trait;

use crate::error::ReviewAppError;
use crate::github::permission::CollaboratorPermission;
use crate::github::repository::{PullRequestNumber, RepositoryRef};

/// Gateway for repository permission lookups and label mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceControlGateway: Send + Sync {
    /// Fetch the permission level `username` holds on `repository`.
    async fn collaborator_permission(
        &self,
        repository: &RepositoryRef,
        username: &str,
    ) -> Result<CollaboratorPermission, ReviewAppError>;

    /// Add labels to the pull request's issue.
    async fn add_labels(
        &self,
        repository: &RepositoryRef,
        number: PullRequestNumber,
        labels: &[String],
    ) -> Result<(), ReviewAppError>;
}
