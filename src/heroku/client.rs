//! `reqwest` implementation of the platform gateway.

use std::fmt::Display;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, RANGE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::credentials::ApiToken;
use crate::error::ReviewAppError;

use super::PlatformGateway;
use super::models::{CreateOutcome, CreateReviewAppRequest, PipelineId, ReviewApp, ReviewAppId};

const SERVICE: &str = "Heroku";
const ACCEPT_V3: &str = "application/vnd.heroku+json; version=3";
const NEXT_RANGE: &str = "Next-Range";

/// Heroku Platform API gateway.
#[derive(Debug, Clone)]
pub struct HerokuGateway {
    client: Client,
    base_url: String,
    token: ApiToken,
}

impl HerokuGateway {
    /// Builds a gateway authenticating with `token` against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::Configuration`] when the HTTP client cannot
    /// be configured.
    pub fn new(
        token: &ApiToken,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ReviewAppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| ReviewAppError::Configuration {
                message: format!("failed to configure Heroku HTTP client: {error}"),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorised(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(self.token.value())
            .header(ACCEPT, ACCEPT_V3)
    }

    async fn send(operation: &str, builder: RequestBuilder) -> Result<Response, ReviewAppError> {
        builder
            .send()
            .await
            .map_err(|error| ReviewAppError::Network {
                message: format!("{operation} failed: {error}"),
            })
    }

    async fn decode<T: DeserializeOwned>(
        operation: &str,
        response: Response,
    ) -> Result<T, ReviewAppError> {
        let status = response.status();
        response
            .json::<T>()
            .await
            .map_err(|error| ReviewAppError::Platform {
                status: status.as_u16(),
                message: format!("{operation} returned a body that could not be decoded: {error}"),
            })
    }
}

#[async_trait]
impl PlatformGateway for HerokuGateway {
    async fn list_review_apps(
        &self,
        pipeline: &PipelineId,
    ) -> Result<Vec<ReviewApp>, ReviewAppError> {
        let operation = "list review apps";
        let url = self.endpoint(&format!("/pipelines/{}/review-apps", pipeline.as_str()));
        let mut apps = Vec::new();
        let mut range: Option<String> = None;

        loop {
            let mut builder = self.authorised(self.client.get(&url));
            if let Some(requested) = range.as_deref() {
                builder = builder.header(RANGE, requested);
            }
            let response = Self::send(operation, builder).await?;
            let page_response = ensure_success(operation, response).await?;
            range = next_range(&page_response);
            let page: Vec<ReviewApp> = Self::decode(operation, page_response).await?;
            apps.extend(page);

            if range.is_none() {
                return Ok(apps);
            }
        }
    }

    async fn delete_review_app(&self, id: &ReviewAppId) -> Result<(), ReviewAppError> {
        let operation = "delete review app";
        let url = self.endpoint(&format!("/review-apps/{}", id.as_str()));
        let response = Self::send(operation, self.authorised(self.client.delete(url))).await?;
        ensure_success(operation, response).await.map(drop)
    }

    async fn create_review_app(
        &self,
        request: &CreateReviewAppRequest,
    ) -> Result<CreateOutcome, ReviewAppError> {
        let operation = "create review app";
        let url = self.endpoint("/review-apps");
        let builder = self.authorised(self.client.post(url)).json(request);
        let response = Self::send(operation, builder).await?;

        if response.status() == StatusCode::CONFLICT {
            return Ok(CreateOutcome::AlreadyExists);
        }

        ensure_success(operation, response)
            .await
            .map(|_| CreateOutcome::Created)
    }
}

async fn ensure_success(operation: &str, response: Response) -> Result<Response, ReviewAppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = error_body_message(response.text().await);
    Err(map_http_error(operation, status, message))
}

/// Range of the next page when Heroku answered with a partial listing.
fn next_range(response: &Response) -> Option<String> {
    if response.status() != StatusCode::PARTIAL_CONTENT {
        return None;
    }
    response
        .headers()
        .get(NEXT_RANGE)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned)
}

pub(super) fn error_body_message<E: Display>(body: Result<String, E>) -> Option<String> {
    match body {
        Ok(text) => extract_heroku_message(&text),
        Err(error) => Some(format!("error body could not be read: {error}")),
    }
}

pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    maybe_message: Option<String>,
) -> ReviewAppError {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        ReviewAppError::Authentication {
            service: SERVICE,
            message: format!("{operation} failed: Heroku returned {status} {message}"),
        }
    } else {
        ReviewAppError::Platform {
            status: status.as_u16(),
            message: format!("{operation} failed: {message}"),
        }
    }
}

/// Pulls `message` out of a Heroku error body such as
/// `{"id": "not_found", "message": "Couldn't find that pipeline."}`.
pub(super) fn extract_heroku_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}
