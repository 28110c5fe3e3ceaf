//! Construction of the authenticated tarball URL Heroku builds from.

use url::Url;

use crate::credentials::ApiToken;
use crate::error::ReviewAppError;
use crate::github::RepositoryRef;
use crate::heroku::SourceArchiveUrl;

/// Builds `https://{owner}:{token}@{api}/repos/{owner}/{repo}/tarball/{branch}`.
///
/// Branch names containing `/` keep their slashes as path separators.
///
/// # Errors
///
/// Returns [`ReviewAppError::InvalidUrl`] when the API base cannot carry a
/// path or credentials.
pub fn tarball_url(
    api_base: &Url,
    repository: &RepositoryRef,
    branch: &str,
    token: &ApiToken,
) -> Result<SourceArchiveUrl, ReviewAppError> {
    let owner = repository.owner().as_str();
    let mut url = api_base.clone();

    url.path_segments_mut()
        .map_err(|()| ReviewAppError::InvalidUrl(format!("{api_base} cannot be a base URL")))?
        .pop_if_empty()
        .extend(["repos", owner, repository.name().as_str(), "tarball"])
        .extend(branch.split('/'));

    url.set_username(owner)
        .map_err(|()| ReviewAppError::InvalidUrl(format!("{api_base} cannot carry a username")))?;
    url.set_password(Some(token.value()))
        .map_err(|()| ReviewAppError::InvalidUrl(format!("{api_base} cannot carry a password")))?;

    Ok(SourceArchiveUrl::new(url))
}
