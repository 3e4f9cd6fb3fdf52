// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `envspect` Fetch
//!
//! The collection engine: resilient primitives for walking a rate-limited
//! REST API and folding the results into a single report.
//!
//! The layers, bottom up:
//!
//! - [`retry`] wraps one request in exponential backoff against HTTP 429,
//!   honoring the server's `retry-after` hint when it carries one
//! - [`paginate`] walks a token-cursored listing to exhaustion
//! - [`collector`] runs the whole account: contexts with their variables,
//!   then a jittered concurrent fan-out over repositories
//! - [`aggregate`] folds per-repository outcomes into the final [`Report`]
//!
//! The engine talks to the API through the [`ConfigSource`] trait, so the
//! HTTP client lives elsewhere and tests script responses directly.
//!
//! [`Report`]: envspect_core::Report

pub mod aggregate;
pub mod collector;
pub mod error;
pub mod paginate;
pub mod retry;
pub mod source;

pub use aggregate::build_report;
pub use collector::{Collector, CollectorOptions, ProjectOutcome, SubFetch, SubFetchKind};
pub use error::FetchError;
pub use paginate::collect_pages;
pub use retry::{with_rate_limit_retry, RetryPolicy};
pub use source::{ApiResponse, ConfigSource, Page};
