//! The remote configuration source abstraction.
//!
//! The engine never talks HTTP directly; it drives a [`ConfigSource`] and
//! reasons about [`ApiResponse`] records. The concrete CircleCI client lives
//! in the API crate, and tests substitute scripted sources at this seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use envspect_core::{CheckoutKey, Context, ContextVariable, ProjectVariable, RepoId, SshKey};

use crate::error::FetchError;

// ============================================================================
// API Response
// ============================================================================

/// The status, retry hint, and body of one API call.
///
/// Non-success responses are data, not errors: the retrier inspects the
/// status and the per-repository jobs record final failures. Only transport
/// problems surface as [`FetchError`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase for the status (e.g. `Too Many Requests`).
    pub status_text: String,
    /// Parsed `Retry-After` header, in seconds.
    pub retry_after: Option<u64>,
    /// Parsed body, present on success.
    pub body: Option<T>,
    /// Raw body text, kept on non-success for error reporting.
    pub error_body: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Creates a successful (200) response around a parsed body.
    pub fn success(body: T) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            retry_after: None,
            body: Some(body),
            error_body: None,
        }
    }

    /// Creates a non-success response with a status and reason phrase.
    pub fn failure(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            retry_after: None,
            body: None,
            error_body: None,
        }
    }

    /// Attaches a `Retry-After` hint, in seconds.
    pub fn with_retry_after(mut self, secs: u64) -> Self {
        self.retry_after = Some(secs);
        self
    }

    /// Attaches the raw error body text.
    pub fn with_error_body(mut self, body: impl Into<String>) -> Self {
        self.error_body = Some(body.into());
        self
    }

    /// Returns true for a 200 response.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// Returns true for a 429 response.
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    /// Maps the success body, keeping status and headers as they are.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            status: self.status,
            status_text: self.status_text,
            retry_after: self.retry_after,
            body: self.body.map(f),
            error_body: self.error_body,
        }
    }
}

// ============================================================================
// Page
// ============================================================================

/// One page of a cursor-paginated listing (the v2 `items` envelope).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page; may be empty on intermediate pages.
    ///
    /// The default is spelled as a path so the derived impl does not
    /// demand `T: Default`; item types are wire DTOs without one.
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Opaque cursor for the next page; absent or null on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

impl<T> Page<T> {
    /// Creates a page with items and no continuation token.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page_token: None,
        }
    }

    /// Creates a page with items and a continuation token.
    pub fn with_token(items: Vec<T>, token: impl Into<String>) -> Self {
        Self {
            items,
            next_page_token: Some(token.into()),
        }
    }

    /// Returns true if a non-empty continuation token is present.
    ///
    /// An empty token means the listing is finished; some servers send `""`
    /// instead of omitting the field.
    pub fn has_more(&self) -> bool {
        self.next_page_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_page_token: None,
        }
    }
}

// ============================================================================
// Config Source Trait
// ============================================================================

/// A remote source of CircleCI account configuration.
///
/// One method per endpoint the collector drives. Methods return
/// `ApiResponse` so the engine can see statuses and retry hints; they return
/// `Err` only for transport-level failures.
///
/// ## Implementing a Source
///
/// ```ignore
/// struct CircleciClient { /* http client, base urls, token */ }
///
/// #[async_trait]
/// impl ConfigSource for CircleciClient {
///     async fn contexts_page(
///         &self,
///         owner_id: &str,
///         page_token: Option<&str>,
///     ) -> Result<ApiResponse<Page<Context>>, FetchError> {
///         // GET /context?owner-id={owner_id}[&page-token={page_token}]
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// One page of the account's contexts.
    async fn contexts_page(
        &self,
        owner_id: &str,
        page_token: Option<&str>,
    ) -> Result<ApiResponse<Page<Context>>, FetchError>;

    /// One page of a context's environment variables.
    async fn context_variables_page(
        &self,
        context_id: &str,
        page_token: Option<&str>,
    ) -> Result<ApiResponse<Page<ContextVariable>>, FetchError>;

    /// A repository's project environment variables.
    async fn project_variables(
        &self,
        repo: &RepoId,
    ) -> Result<ApiResponse<Page<ProjectVariable>>, FetchError>;

    /// A repository's SSH checkout keys.
    async fn checkout_keys(
        &self,
        repo: &RepoId,
    ) -> Result<ApiResponse<Page<CheckoutKey>>, FetchError>;

    /// A repository's additional SSH keys from the v1.1 project settings.
    async fn additional_ssh_keys(
        &self,
        repo: &RepoId,
    ) -> Result<ApiResponse<Vec<SshKey>>, FetchError>;
}

// ============================================================================
// Tests
// ============================================================================
