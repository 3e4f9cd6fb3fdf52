//! CircleCI API client.
//!
//! One client speaks both API generations: contexts, variables and checkout
//! keys live on v2, while additional SSH keys and the followed-project
//! listing only exist on v1.1. Endpoint responses are folded into
//! [`ApiResponse`] values so the collection engine can reason about
//! statuses and `retry-after` hints without touching HTTP types.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

use envspect_core::{
    CheckoutKey, Context, ContextVariable, ProjectVariable, RepoId, SshKey, Vcs,
};
use envspect_fetch::{ApiResponse, ConfigSource, FetchError, Page};

use crate::http::{self, ResponseExt};

// ============================================================================
// Constants
// ============================================================================

/// Default v2 API base URL.
const DEFAULT_V2_BASE: &str = "https://circleci.com/api/v2";

/// Default v1.1 API base URL.
const DEFAULT_V1_BASE: &str = "https://circleci.com/api/v1.1";

/// Header carrying the personal API token.
const CIRCLE_TOKEN_HEADER: &str = "Circle-Token";

// ============================================================================
// API Response Types
// ============================================================================

/// One entry from `/me/collaborations`: an account the token can act for.
#[derive(Debug, Clone, Deserialize)]
pub struct Collaboration {
    /// Owner id, the handle context listing keys on.
    pub id: String,

    /// Account name as shown in the CircleCI UI.
    pub name: String,

    /// VCS the account lives on (`github` or `bitbucket`).
    #[serde(alias = "vcs-type")]
    pub vcs_type: String,

    /// Project slug prefix, when the API provides one.
    #[serde(default)]
    pub slug: Option<String>,
}

impl Collaboration {
    /// Returns true when the collaboration lives on the given VCS.
    pub fn is_on(&self, vcs: Vcs) -> bool {
        self.vcs_type.eq_ignore_ascii_case(vcs.api_name())
    }
}

/// One entry from the v1.1 `/projects` listing: a project the token's user
/// follows.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowedProject {
    /// Repository owner (organization or user).
    pub username: String,

    /// Repository name.
    pub reponame: String,

    /// VCS the project lives on, when reported.
    #[serde(default)]
    pub vcs_type: Option<String>,
}

impl FollowedProject {
    /// The `owner/name` repository id.
    pub fn repo_id(&self) -> RepoId {
        RepoId::new(&self.username, &self.reponame)
    }
}

/// The v1.1 project settings payload, reduced to the SSH key list.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSettings {
    /// Additional SSH keys configured for the project.
    #[serde(default)]
    pub ssh_keys: Vec<SshKey>,
}

// ============================================================================
// Configuration
// ============================================================================

/// Connection settings for the CircleCI API.
#[derive(Clone)]
pub struct CircleciConfig {
    /// Personal API token, sent as the `Circle-Token` header.
    pub token: String,
    /// Which VCS the account's projects live on.
    pub vcs: Vcs,
    /// Base URL for the v2 API.
    pub v2_base: String,
    /// Base URL for the v1.1 API.
    pub v1_base: String,
}

impl CircleciConfig {
    /// Creates settings with the hosted CircleCI base URLs.
    pub fn new(token: impl Into<String>, vcs: Vcs) -> Self {
        Self {
            token: token.into(),
            vcs,
            v2_base: DEFAULT_V2_BASE.to_string(),
            v1_base: DEFAULT_V1_BASE.to_string(),
        }
    }

    /// Overrides the v2 base URL (server installs, tests).
    pub fn with_v2_base(mut self, base: impl Into<String>) -> Self {
        self.v2_base = http::normalize_base(base);
        self
    }

    /// Overrides the v1.1 base URL.
    pub fn with_v1_base(mut self, base: impl Into<String>) -> Self {
        self.v1_base = http::normalize_base(base);
        self
    }
}

// ============================================================================
// API Client
// ============================================================================

/// CircleCI API client.
///
/// Implements [`ConfigSource`], so a collector can drive it directly.
pub struct CircleciClient {
    http: reqwest::Client,
    config: CircleciConfig,
}

impl CircleciClient {
    /// Creates a client over the given connection settings.
    pub fn new(config: CircleciConfig) -> Self {
        Self {
            http: http::build_client(),
            config,
        }
    }

    /// Lists the accounts the token can act for.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or any non-success status; without this
    /// listing there is no owner id to collect under.
    #[instrument(skip(self))]
    pub async fn collaborations(&self) -> Result<Vec<Collaboration>, FetchError> {
        let url = format!("{}/me/collaborations", self.config.v2_base);
        let response = self.get_api(&url).await?;
        require_success("Collaborations", response)
    }

    /// Lists the projects the token's user follows (v1.1).
    ///
    /// This is the listing Bitbucket accounts rely on; there is no org
    /// repository endpoint for them here.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or any non-success status.
    #[instrument(skip(self))]
    pub async fn followed_projects(&self) -> Result<Vec<FollowedProject>, FetchError> {
        let url = format!("{}/projects", self.config.v1_base);
        let response = self.get_api(&url).await?;
        require_success("Followed projects", response)
    }

    /// The v2 project slug, e.g. `gh/acme/widgets`.
    fn project_slug(&self, repo: &RepoId) -> String {
        format!("{}/{}", self.config.vcs.slug_prefix(), repo)
    }

    /// Performs a GET and folds the response into an [`ApiResponse`].
    ///
    /// Only a 200 body is parsed; non-success bodies are kept as raw text
    /// for error reporting, alongside any `retry-after` hint.
    async fn get_api<T: DeserializeOwned>(&self, url: &str) -> Result<ApiResponse<T>, FetchError> {
        debug!(url, "GET");
        let response = self
            .http
            .get(url)
            .header(CIRCLE_TOKEN_HEADER, &self.config.token)
            .send()
            .await?;

        let status = response.status().as_u16();
        let status_text = response.status_text();
        let retry_after = response.retry_after_secs();
        let text = response.text().await?;

        if status == 200 {
            let body: T = serde_json::from_str(&text)?;
            Ok(ApiResponse::success(body))
        } else {
            debug!(status, status_text = %status_text, "Non-success response");
            let mut failure = ApiResponse::failure(status, status_text).with_error_body(text);
            if let Some(secs) = retry_after {
                failure = failure.with_retry_after(secs);
            }
            Ok(failure)
        }
    }
}

#[async_trait]
impl ConfigSource for CircleciClient {
    async fn contexts_page(
        &self,
        owner_id: &str,
        page_token: Option<&str>,
    ) -> Result<ApiResponse<Page<Context>>, FetchError> {
        let mut url = format!("{}/context?owner-id={owner_id}", self.config.v2_base);
        if let Some(token) = page_token {
            url.push_str("&page-token=");
            url.push_str(token);
        }
        self.get_api(&url).await
    }

    async fn context_variables_page(
        &self,
        context_id: &str,
        page_token: Option<&str>,
    ) -> Result<ApiResponse<Page<ContextVariable>>, FetchError> {
        let mut url = format!(
            "{}/context/{context_id}/environment-variable",
            self.config.v2_base
        );
        if let Some(token) = page_token {
            url.push_str("?page-token=");
            url.push_str(token);
        }
        self.get_api(&url).await
    }

    async fn project_variables(
        &self,
        repo: &RepoId,
    ) -> Result<ApiResponse<Page<ProjectVariable>>, FetchError> {
        let url = format!(
            "{}/project/{}/envvar",
            self.config.v2_base,
            self.project_slug(repo)
        );
        self.get_api(&url).await
    }

    async fn checkout_keys(
        &self,
        repo: &RepoId,
    ) -> Result<ApiResponse<Page<CheckoutKey>>, FetchError> {
        let url = format!(
            "{}/project/{}/checkout-key",
            self.config.v2_base,
            self.project_slug(repo)
        );
        self.get_api(&url).await
    }

    async fn additional_ssh_keys(
        &self,
        repo: &RepoId,
    ) -> Result<ApiResponse<Vec<SshKey>>, FetchError> {
        // Only the v1.1 settings payload carries these.
        let url = format!(
            "{}/project/{}/{}/settings",
            self.config.v1_base,
            self.config.vcs.api_name(),
            repo
        );
        let response: ApiResponse<ProjectSettings> = self.get_api(&url).await?;
        Ok(response.map(|settings| settings.ssh_keys))
    }
}

/// Unwraps a response the caller requires to succeed.
fn require_success<T>(operation: &str, response: ApiResponse<T>) -> Result<T, FetchError> {
    if response.is_success() {
        response.body.ok_or_else(|| {
            FetchError::InvalidResponse("success response carried no body".to_string())
        })
    } else {
        Err(FetchError::RequestFailed {
            operation: operation.to_string(),
            status: response.status,
            status_text: response.status_text,
            body: response.error_body.unwrap_or_default(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
