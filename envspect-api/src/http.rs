//! Shared HTTP plumbing for the API clients.

use std::time::Duration;

use reqwest::{header, Client, Response};

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string sent with every request.
const USER_AGENT: &str = concat!("envspect/", env!("CARGO_PKG_VERSION"));

/// Builds the HTTP client shared by a single API client instance.
///
/// # Panics
///
/// Panics if the client cannot be built. This should only occur if the
/// system's TLS configuration is fundamentally broken, making network
/// operations impossible. This is considered unrecoverable at runtime.
pub(crate) fn build_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|e| {
            panic!(
                "Failed to create HTTP client: {e}. \
                This usually indicates a broken TLS configuration."
            )
        })
}

/// Extension helpers for `reqwest::Response`.
pub(crate) trait ResponseExt {
    /// The `retry-after` header value, parsed as whole seconds.
    fn retry_after_secs(&self) -> Option<u64>;

    /// The canonical reason phrase for the response status.
    fn status_text(&self) -> String;
}

impl ResponseExt for Response {
    fn retry_after_secs(&self) -> Option<u64> {
        self.headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    }

    fn status_text(&self) -> String {
        self.status()
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string()
    }
}

/// Strips a trailing slash so endpoint paths can be appended uniformly.
pub(crate) fn normalize_base(base: impl Into<String>) -> String {
    let base = base.into();
    base.trim_end_matches('/').to_string()
}

// ============================================================================
// Tests
// ============================================================================
