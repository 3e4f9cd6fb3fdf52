//! Repository identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A repository identifier in `owner/name` form.
///
/// CircleCI and GitHub both address repositories by this two-part name. The
/// collection engine treats it as an opaque key; the API layer appends it to
/// VCS-qualified paths (`gh/owner/name`, `github/owner/name`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoId(String);

impl RepoId {
    /// Creates a repository id from its owner and repository names.
    pub fn new(owner: &str, name: &str) -> Self {
        Self(format!("{owner}/{name}"))
    }

    /// Wraps a full name already in `owner/name` form, without validation.
    ///
    /// Listing APIs return full names verbatim; parse user input with
    /// [`FromStr`] instead.
    pub fn from_full_name(full_name: impl Into<String>) -> Self {
        Self(full_name.into())
    }

    /// Returns the full `owner/name` string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RepoId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self(s.to_string()))
            }
            _ => Err(CoreError::InvalidRepoId(s.to_string())),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
