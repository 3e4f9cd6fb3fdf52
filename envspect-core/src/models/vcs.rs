//! VCS provider types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// VCS Kind
// ============================================================================

/// Version control systems a CircleCI account can host projects from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vcs {
    /// GitHub (`github.com`)
    GitHub,
    /// Bitbucket (`bitbucket.org`)
    Bitbucket,
}

impl Vcs {
    /// Returns the display name for this VCS.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::GitHub => "GitHub",
            Self::Bitbucket => "Bitbucket",
        }
    }

    /// Returns the short prefix used in CircleCI v2 project slugs
    /// (`gh/owner/repo`, `bb/owner/repo`).
    pub fn slug_prefix(&self) -> &'static str {
        match self {
            Self::GitHub => "gh",
            Self::Bitbucket => "bb",
        }
    }

    /// Returns the lowercase name used in CircleCI v1.1 paths and in
    /// collaboration records (`vcs_type`).
    pub fn api_name(&self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::Bitbucket => "bitbucket",
        }
    }

    /// Returns all supported VCS kinds.
    pub fn all() -> &'static [Vcs] {
        &[Self::GitHub, Self::Bitbucket]
    }
}

impl fmt::Display for Vcs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Vcs {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "github" | "gh" => Ok(Self::GitHub),
            "bitbucket" | "bb" => Ok(Self::Bitbucket),
            other => Err(CoreError::UnknownVcs(other.to_string())),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_prefix() {
        assert_eq!(Vcs::GitHub.slug_prefix(), "gh");
        assert_eq!(Vcs::Bitbucket.slug_prefix(), "bb");
    }

    #[test]
    fn test_api_name() {
        assert_eq!(Vcs::GitHub.api_name(), "github");
        assert_eq!(Vcs::Bitbucket.api_name(), "bitbucket");
    }

    #[test]
    fn test_from_str_accepts_case_and_aliases() {
        assert_eq!("GitHub".parse::<Vcs>().unwrap(), Vcs::GitHub);
        assert_eq!("bitbucket".parse::<Vcs>().unwrap(), Vcs::Bitbucket);
        assert_eq!("gh".parse::<Vcs>().unwrap(), Vcs::GitHub);
        assert_eq!("bb".parse::<Vcs>().unwrap(), Vcs::Bitbucket);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("gitlab".parse::<Vcs>().is_err());
    }
}
