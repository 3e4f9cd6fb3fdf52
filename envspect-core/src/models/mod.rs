//! Domain models for envspect.
//!
//! This module contains the data structures the collector produces and the
//! report file carries. Wire-facing types keep the field names the CircleCI
//! APIs use (kebab-case for v2 checkout keys, snake_case for v1.1).
//!
//! ## Submodules
//!
//! - [`vcs`] - Supported version control systems
//! - [`repo`] - Repository identifiers (`owner/name`)
//! - [`context`] - Contexts and context variables
//! - [`project`] - Project variables, checkout keys, additional SSH keys
//! - [`report`] - The consolidated report

mod context;
mod project;
mod repo;
mod report;
mod vcs;

// Re-export everything at the models level
pub use context::{Context, ContextData, ContextVariable};
pub use project::{CheckoutKey, ProjectData, ProjectVariable, SshKey};
pub use repo::RepoId;
pub use report::Report;
pub use vcs::Vcs;

#[cfg(test)]
mod serde_tests;
