//! Collaborator permission levels and the allow-list that gates deployments.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::error::ReviewAppError;

/// Access tier GitHub assigns a user for a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CollaboratorPermission {
    /// No access.
    None,
    /// Read-only access.
    Read,
    /// Can manage issues and pull requests without write access.
    Triage,
    /// Can push to the repository.
    Write,
    /// Can manage the repository without admin rights.
    Maintain,
    /// Full administrative access.
    Admin,
}

impl CollaboratorPermission {
    /// Returns the level as GitHub spells it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Read => "read",
            Self::Triage => "triage",
            Self::Write => "write",
            Self::Maintain => "maintain",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for CollaboratorPermission {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A permission name that does not match any known level.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown collaborator permission `{0}`")]
pub struct UnknownPermission(pub String);

impl FromStr for CollaboratorPermission {
    type Err = UnknownPermission;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "none" => Ok(Self::None),
            "read" => Ok(Self::Read),
            "triage" => Ok(Self::Triage),
            "write" => Ok(Self::Write),
            "maintain" => Ok(Self::Maintain),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownPermission(other.to_owned())),
        }
    }
}

/// Permission levels allowed to trigger a review app deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedPermissions(BTreeSet<CollaboratorPermission>);

impl AllowedPermissions {
    /// Parses a comma-separated list such as `write,maintain,admin`.
    ///
    /// Entries are trimmed and empty entries are skipped. A blank list yields
    /// the default set.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::Configuration`] when an entry is not a known
    /// level or when the list contains only separators.
    pub fn parse(list: &str) -> Result<Self, ReviewAppError> {
        if list.trim().is_empty() {
            return Ok(Self::default());
        }

        let levels = list
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                entry
                    .parse::<CollaboratorPermission>()
                    .map_err(|error| ReviewAppError::Configuration {
                        message: format!("collaborator permission list: {error}"),
                    })
            })
            .collect::<Result<BTreeSet<_>, _>>()?;

        if levels.is_empty() {
            return Err(ReviewAppError::Configuration {
                message: format!("collaborator permission list `{list}` names no levels"),
            });
        }

        Ok(Self(levels))
    }

    /// Returns true when `level` may deploy review apps.
    #[must_use]
    pub fn contains(&self, level: CollaboratorPermission) -> bool {
        self.0.contains(&level)
    }
}

impl Default for AllowedPermissions {
    fn default() -> Self {
        Self(BTreeSet::from([
            CollaboratorPermission::Triage,
            CollaboratorPermission::Write,
            CollaboratorPermission::Maintain,
            CollaboratorPermission::Admin,
        ]))
    }
}

impl fmt::Display for AllowedPermissions {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|level| level.as_str()).collect();
        formatter.write_str(&names.join(","))
    }
}
