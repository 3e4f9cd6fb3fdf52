//! Core error types for `envspect`.

use thiserror::Error;

/// Core error type for `envspect` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Unrecognized VCS name.
    #[error("unknown VCS \"{0}\" (expected github or bitbucket)")]
    UnknownVcs(String),

    /// Repository identifier not in `owner/name` form.
    #[error("invalid repository id \"{0}\" (expected owner/name)")]
    InvalidRepoId(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
