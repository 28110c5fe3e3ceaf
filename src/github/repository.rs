//! Identity wrappers for repositories and pull requests.

use std::fmt;

use crate::error::ReviewAppError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Wraps a non-empty owner login.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::InvalidEvent`] when the login is empty.
    pub fn new(value: &str) -> Result<Self, ReviewAppError> {
        if value.is_empty() {
            return Err(ReviewAppError::InvalidEvent {
                message: "repository owner login is empty".to_owned(),
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Wraps a non-empty repository name.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::InvalidEvent`] when the name is empty.
    pub fn new(value: &str) -> Result<Self, ReviewAppError> {
        if value.is_empty() {
            return Err(ReviewAppError::InvalidEvent {
                message: "repository name is empty".to_owned(),
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    /// Wraps a positive pull request number.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::InvalidEvent`] when the number is zero.
    pub fn new(value: u64) -> Result<Self, ReviewAppError> {
        if value == 0 {
            return Err(ReviewAppError::InvalidEvent {
                message: "pull request number must be a positive integer".to_owned(),
            });
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PullRequestNumber {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

/// Owner and name of a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    owner: RepositoryOwner,
    name: RepositoryName,
}

impl RepositoryRef {
    /// Pairs an owner with a repository name.
    #[must_use]
    pub const fn new(owner: RepositoryOwner, name: RepositoryName) -> Self {
        Self { owner, name }
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn name(&self) -> &RepositoryName {
        &self.name
    }

    pub(crate) fn collaborator_permission_path(&self, username: &str) -> String {
        format!(
            "/repos/{}/{}/collaborators/{username}/permission",
            self.owner.as_str(),
            self.name.as_str()
        )
    }

    pub(crate) fn issue_labels_path(&self, number: PullRequestNumber) -> String {
        format!(
            "/repos/{}/{}/issues/{}/labels",
            self.owner.as_str(),
            self.name.as_str(),
            number.get()
        )
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}/{}", self.owner.as_str(), self.name.as_str())
    }
}
