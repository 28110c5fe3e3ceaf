//! Heroku Platform API gateway for pipeline review apps.

mod client;
pub mod models;

pub use client::HerokuGateway;
pub use models::{
    CreateOutcome, CreateReviewAppRequest, PipelineId, ReviewApp, ReviewAppId, SourceArchiveUrl,
    SourceBlob,
};

use async_trait::async_trait;

use crate::error::ReviewAppError;

/// Gateway for the review app endpoints of a deployment platform.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlatformGateway: Send + Sync {
    /// List every review app in the pipeline.
    async fn list_review_apps(
        &self,
        pipeline: &PipelineId,
    ) -> Result<Vec<ReviewApp>, ReviewAppError>;

    /// Delete a review app by id.
    async fn delete_review_app(&self, id: &ReviewAppId) -> Result<(), ReviewAppError>;

    /// Request a new review app.
    ///
    /// A conflict response is reported as [`CreateOutcome::AlreadyExists`];
    /// every other failure is an error.
    async fn create_review_app(
        &self,
        request: &CreateReviewAppRequest,
    ) -> Result<CreateOutcome, ReviewAppError>;
}

#[cfg(test)]
mod tests;
