//! GitHub API client.
//!
//! Only does one thing: list every repository an account owns, so the
//! collector knows which CircleCI projects to visit. GitHub pages by
//! number rather than cursor, so this walk lives here instead of going
//! through the token-based paginator.

use std::future::Future;

use reqwest::header;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use envspect_core::RepoId;
use envspect_fetch::{ApiResponse, FetchError};

use crate::http::{self, ResponseExt};

// ============================================================================
// Constants
// ============================================================================

/// Default API base URL.
const DEFAULT_BASE: &str = "https://api.github.com";

/// Repositories fetched per page.
const PAGE_SIZE: u32 = 100;

/// Media type GitHub asks REST clients to send.
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

// ============================================================================
// Account
// ============================================================================

/// Whose repositories to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GithubAccount {
    /// An organization's repositories (`/orgs/{name}/repos`).
    Organization(String),
    /// The token's own repositories (`/user/repos`).
    User,
}

impl GithubAccount {
    /// The listing path for this account.
    fn repos_path(&self) -> String {
        match self {
            Self::Organization(name) => format!("orgs/{name}/repos"),
            Self::User => "user/repos".to_string(),
        }
    }
}

// ============================================================================
// API Response Types
// ============================================================================

/// The slice of a repository object the listing needs.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubRepo {
    /// `owner/name` form of the repository.
    pub full_name: String,
}

// ============================================================================
// API Client
// ============================================================================

/// GitHub API client.
pub struct GithubClient {
    http: reqwest::Client,
    base: String,
    token: String,
}

impl GithubClient {
    /// Creates a client against the public GitHub API.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base(token, DEFAULT_BASE)
    }

    /// Creates a client against a custom base URL (GitHub Enterprise,
    /// tests).
    pub fn with_base(token: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            http: http::build_client(),
            base: http::normalize_base(base),
            token: token.into(),
        }
    }

    /// Lists every repository the account owns.
    ///
    /// Pages are fetched in order, starting at page 1; the walk stops at
    /// the first empty page.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or any non-success status. The repository
    /// list is foundational input, so there is no partial result to salvage.
    #[instrument(skip(self))]
    pub async fn list_repositories(
        &self,
        account: &GithubAccount,
    ) -> Result<Vec<RepoId>, FetchError> {
        let repos = collect_repo_pages(|page| self.fetch_repo_page(account, page)).await?;
        info!(repos = repos.len(), "Listed repositories");
        Ok(repos)
    }

    /// Fetches one numbered page of the account's repositories.
    async fn fetch_repo_page(
        &self,
        account: &GithubAccount,
        page: u32,
    ) -> Result<ApiResponse<Vec<GithubRepo>>, FetchError> {
        let url = format!(
            "{}/{}?per_page={PAGE_SIZE}&page={page}",
            self.base,
            account.repos_path()
        );
        debug!(url, "GET");
        let response = self
            .http
            .get(&url)
            .header(header::AUTHORIZATION, format!("token {}", self.token))
            .header(header::ACCEPT, GITHUB_ACCEPT)
            .send()
            .await?;

        let status = response.status().as_u16();
        let status_text = response.status_text();
        let text = response.text().await?;

        if status == 200 {
            let batch: Vec<GithubRepo> = serde_json::from_str(&text)?;
            Ok(ApiResponse::success(batch))
        } else {
            Ok(ApiResponse::failure(status, status_text).with_error_body(text))
        }
    }
}

/// Walks the numbered repository pages to exhaustion.
///
/// `fetch` is invoked with page numbers from 1 upward until it returns an
/// empty batch; full names are mapped to [`RepoId`]s in page order.
///
/// # Errors
///
/// A non-success page is fatal: the walk stops with
/// [`FetchError::RequestFailed`] carrying the status and error body.
/// Transport errors from `fetch` propagate unchanged.
async fn collect_repo_pages<F, Fut>(mut fetch: F) -> Result<Vec<RepoId>, FetchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<ApiResponse<Vec<GithubRepo>>, FetchError>>,
{
    let mut repos = Vec::new();
    let mut page: u32 = 1;

    loop {
        let response = fetch(page).await?;
        if !response.is_success() {
            return Err(FetchError::RequestFailed {
                operation: "GitHub repository listing".to_string(),
                status: response.status,
                status_text: response.status_text,
                body: response.error_body.unwrap_or_default(),
            });
        }

        let batch = response.body.ok_or_else(|| {
            FetchError::InvalidResponse("success response carried no repository batch".to_string())
        })?;
        if batch.is_empty() {
            debug!(pages = page, repos = repos.len(), "Listing complete");
            return Ok(repos);
        }

        repos.extend(
            batch
                .into_iter()
                .map(|repo| RepoId::from_full_name(repo.full_name)),
        );
        page += 1;
    }
}

// ============================================================================
// Tests
// ============================================================================
