// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `envspect` Core
//!
//! Core types and models for the `envspect` tool.
//!
//! This crate provides the foundational data structures used across the
//! other `envspect` crates:
//!
//! - Domain models (contexts, project variables, SSH keys, the report)
//! - Error types
//! - VCS and repository identifiers
//!
//! ## Key Types
//!
//! ### Identifiers
//! - [`Vcs`] - Supported version control systems (GitHub, Bitbucket)
//! - [`RepoId`] - Repository identifier in `owner/name` form
//!
//! ### Context Types
//! - [`Context`] - A context from the v2 listing
//! - [`ContextVariable`] - An environment variable attached to a context
//! - [`ContextData`] - Report entry merging a context with its variables
//!
//! ### Project Types
//! - [`ProjectVariable`] - A project environment variable (masked value)
//! - [`CheckoutKey`] - An SSH checkout key
//! - [`SshKey`] - An additional SSH key from the v1.1 settings
//! - [`ProjectData`] - Report entry merging a repository's configuration
//!
//! ### Report
//! - [`Report`] - The consolidated inventory (contexts, projects,
//!   unavailable)

pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Identifiers
    RepoId,
    Vcs,
    // Context types
    Context,
    ContextData,
    ContextVariable,
    // Project types
    CheckoutKey,
    ProjectData,
    ProjectVariable,
    SshKey,
    // Report
    Report,
};
