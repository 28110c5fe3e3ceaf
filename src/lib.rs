//! Review app deployer library crate.
//!
//! The library reacts to one pull request webhook delivery: it removes the
//! Heroku review app already attached to the pull request, checks that the
//! triggering user is a collaborator, and requests a fresh review app when
//! the action calls for one. GitHub access goes through Octocrab and Heroku
//! access through `reqwest`; both sit behind traits so the reconciliation
//! logic can be exercised without a network.

pub mod action;
pub mod config;
pub mod credentials;
pub mod error;
pub mod github;
pub mod heroku;
pub mod output;
pub mod reconciler;

pub use action::run;
pub use config::ReviewAppConfig;
pub use credentials::ApiToken;
pub use error::ReviewAppError;
pub use github::{
    AllowedPermissions, CollaboratorPermission, EventSource, OctocrabSourceControlGateway,
    PullRequestAction, PullRequestEvent, SourceControlGateway,
};
pub use heroku::{CreateOutcome, HerokuGateway, PlatformGateway, ReviewApp};
pub use output::ActionOutput;
pub use reconciler::{
    DeploymentStatus, ReconcileOutcome, ReconcilerSettings, ReconciliationDecision,
    ReviewAppReconciler, SkipReason,
};
