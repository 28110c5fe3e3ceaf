//! Octocrab client construction helpers for gateway implementations.

use http::Uri;
use octocrab::Octocrab;

use crate::credentials::ApiToken;
use crate::error::ReviewAppError;

use super::error_mapping::map_octocrab_error;

/// Builds an Octocrab client for the given token and API base URL.
///
/// # Errors
///
/// Returns `ReviewAppError::InvalidUrl` when the base URI cannot be parsed or
/// `ReviewAppError::GitHub` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: &ApiToken,
    api_base: &str,
) -> Result<Octocrab, ReviewAppError> {
    let base_uri: Uri = api_base
        .parse::<Uri>()
        .map_err(|error| ReviewAppError::InvalidUrl(format!("{api_base}: {error}")))?;

    Octocrab::builder()
        .personal_token(token.value())
        .base_uri(base_uri)
        .map_err(|error| ReviewAppError::GitHub {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
