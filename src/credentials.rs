//! Credential wrappers for the GitHub and Heroku APIs.

use std::fmt;

use crate::error::ReviewAppError;

/// API token wrapper enforcing presence.
///
/// The `Debug` implementation never prints the token value so that the
/// wrapper can sit inside logged structures.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::MissingSetting`] naming `setting` when the
    /// supplied string is blank.
    pub fn new(setting: &'static str, token: impl AsRef<str>) -> Result<Self, ReviewAppError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ReviewAppError::MissingSetting { name: setting });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for ApiToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("ApiToken(***)")
    }
}
