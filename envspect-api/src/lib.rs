// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `envspect` API
//!
//! HTTP clients for the services the inventory reads from:
//!
//! - [`circleci`]: the CircleCI client; implements the engine's
//!   [`ConfigSource`] trait and resolves owner ids via `/me/collaborations`
//! - [`github`]: repository listing, the input to the project fan-out
//!
//! [`ConfigSource`]: envspect_fetch::ConfigSource

pub mod circleci;
pub mod github;
mod http;

pub use circleci::{CircleciClient, CircleciConfig, Collaboration, FollowedProject};
pub use github::{GithubAccount, GithubClient, GithubRepo};
