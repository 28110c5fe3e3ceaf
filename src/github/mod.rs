//! GitHub side of the review app step.
//!
//! This module parses the pull request webhook payload, models collaborator
//! permission levels, and wraps Octocrab for the two calls the reconciler
//! makes against GitHub: the permission lookup and the label mutation.

pub mod event;
pub mod gateway;
pub mod permission;
pub mod repository;

pub use event::{EventSource, HeadRepository, PullRequestAction, PullRequestEvent};
pub use gateway::{OctocrabSourceControlGateway, SourceControlGateway};
pub use permission::{AllowedPermissions, CollaboratorPermission, UnknownPermission};
pub use repository::{PullRequestNumber, RepositoryName, RepositoryOwner, RepositoryRef};

#[cfg(test)]
pub use gateway::MockSourceControlGateway;
