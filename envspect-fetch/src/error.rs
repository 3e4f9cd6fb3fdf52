//! Fetch error types.

use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for collection operations.
///
/// Everything here is fatal to a run. Per-repository sub-fetch failures are
/// not errors; they are recorded in the outcome and end up in the report's
/// `unavailable` section.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed at the transport level.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A paginated listing returned a non-success page.
    ///
    /// Listings are foundational input; a partial listing would silently
    /// shrink everything downstream, so the run stops here.
    #[error("Listing failed with {status} - {status_text}: {body}")]
    PaginationFailed {
        /// HTTP status of the failed page.
        status: u16,
        /// Reason phrase for the status.
        status_text: String,
        /// Raw error body, for diagnosis.
        body: String,
    },

    /// A response the engine cannot page through carried a continuation
    /// token.
    #[error("Paging for {operation} is not supported")]
    UnsupportedPagination {
        /// The operation whose result was truncated.
        operation: String,
    },

    /// A request the run cannot proceed without returned a non-success
    /// status.
    #[error("{operation} failed with {status} - {status_text}: {body}")]
    RequestFailed {
        /// What was being fetched.
        operation: String,
        /// HTTP status of the response.
        status: u16,
        /// Reason phrase for the status.
        status_text: String,
        /// Raw error body, for diagnosis.
        body: String,
    },

    /// Invalid response from the API.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
