//! Account configuration collection.
//!
//! The collector drives a [`ConfigSource`] through one full run: contexts
//! and their variables first, then a concurrent fan-out over repositories.
//! Each repository job performs three best-effort sub-fetches (project
//! variables, checkout keys, additional SSH keys); a failed sub-fetch is
//! recorded in the outcome rather than aborting the run, so one locked-down
//! repository cannot sink an hour-long collection.

use std::fmt;
use std::time::Duration;

use futures::future::try_join_all;
use futures::stream::{self, StreamExt, TryStreamExt};
use rand::Rng;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use envspect_core::{
    CheckoutKey, ContextData, ContextVariable, ProjectData, ProjectVariable, RepoId, Report,
    SshKey,
};

use crate::aggregate;
use crate::error::FetchError;
use crate::paginate::collect_pages;
use crate::retry::{with_rate_limit_retry, RetryPolicy};
use crate::source::{ApiResponse, ConfigSource, Page};

/// Default cap for each job's random start delay, in milliseconds.
const DEFAULT_JITTER_MS: u64 = 2000;

// ============================================================================
// Sub-Fetch Kind
// ============================================================================

/// The three per-repository sub-fetches, in the order the job runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubFetchKind {
    /// Project environment variables (v2 `envvar`).
    Variables,
    /// SSH checkout keys (v2 `checkout-key`).
    CheckoutKeys,
    /// Additional SSH keys (v1.1 project settings).
    AdditionalKeys,
}

impl SubFetchKind {
    /// The label used in the report's failure descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Variables => "Project environment variables",
            Self::CheckoutKeys => "SSH checkout keys",
            Self::AdditionalKeys => "Additional SSH keys",
        }
    }
}

impl fmt::Display for SubFetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Sub-Fetch Outcome
// ============================================================================

/// Outcome of one best-effort sub-fetch.
///
/// This is the final word after the retrier has run: either the items, or
/// the non-success status the endpoint settled on.
#[derive(Debug, Clone, PartialEq)]
pub enum SubFetch<T> {
    /// The final response was a success.
    Success(Vec<T>),
    /// The final response was a non-success status.
    Failure {
        /// Final HTTP status code.
        status: u16,
        /// Reason phrase for the status.
        status_text: String,
    },
}

impl<T> SubFetch<T> {
    /// Builds the outcome from a paged response, taking the page's items.
    pub fn from_page(response: ApiResponse<Page<T>>) -> Self {
        if response.is_success() {
            Self::Success(response.body.map(|page| page.items).unwrap_or_default())
        } else {
            Self::Failure {
                status: response.status,
                status_text: response.status_text,
            }
        }
    }

    /// Builds the outcome from a plain list response.
    pub fn from_items(response: ApiResponse<Vec<T>>) -> Self {
        if response.is_success() {
            Self::Success(response.body.unwrap_or_default())
        } else {
            Self::Failure {
                status: response.status,
                status_text: response.status_text,
            }
        }
    }

    /// Returns true when the sub-fetch succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The fetched items, when the sub-fetch succeeded.
    pub fn into_items(self) -> Option<Vec<T>> {
        match self {
            Self::Success(items) => Some(items),
            Self::Failure { .. } => None,
        }
    }

    /// The failure description for the report, labeled by `kind`.
    pub fn failure_description(&self, kind: SubFetchKind) -> Option<String> {
        match self {
            Self::Success(_) => None,
            Self::Failure {
                status,
                status_text,
            } => Some(format!("{}: {} - {}", kind.label(), status, status_text)),
        }
    }
}

// ============================================================================
// Project Outcome
// ============================================================================

/// Everything one repository job produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectOutcome {
    /// The repository the job ran for.
    pub repo: RepoId,
    /// Project environment variables.
    pub variables: SubFetch<ProjectVariable>,
    /// SSH checkout keys.
    pub checkout_keys: SubFetch<CheckoutKey>,
    /// Additional SSH keys.
    pub additional_keys: SubFetch<SshKey>,
}

impl ProjectOutcome {
    /// Failure descriptions in sub-fetch order; empty when everything
    /// succeeded.
    pub fn failure_reasons(&self) -> Vec<String> {
        [
            self.variables.failure_description(SubFetchKind::Variables),
            self.checkout_keys
                .failure_description(SubFetchKind::CheckoutKeys),
            self.additional_keys
                .failure_description(SubFetchKind::AdditionalKeys),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Converts the outcome into the report's project entry.
    ///
    /// Failed sub-fetches become absent fields, keeping "could not be read"
    /// distinct from "nothing configured".
    pub fn into_project_data(self) -> ProjectData {
        ProjectData {
            name: self.repo,
            variables: self.variables.into_items(),
            ssh_checkout_keys: self.checkout_keys.into_items(),
            additional_ssh_keys: self.additional_keys.into_items(),
        }
    }
}

// ============================================================================
// Collector Options
// ============================================================================

/// Tunables for the repository fan-out.
#[derive(Debug, Clone)]
pub struct CollectorOptions {
    /// Upper bound (exclusive) for each job's random start delay.
    pub max_jitter: Duration,
    /// Concurrent job ceiling; `None` runs every repository at once.
    pub concurrency: Option<usize>,
}

impl CollectorOptions {
    /// Creates the default options: 2s jitter cap, unbounded concurrency.
    pub fn new() -> Self {
        Self {
            max_jitter: Duration::from_millis(DEFAULT_JITTER_MS),
            concurrency: None,
        }
    }

    /// Sets the jitter cap. `Duration::ZERO` disables the start delay.
    pub fn with_max_jitter(mut self, max_jitter: Duration) -> Self {
        self.max_jitter = max_jitter;
        self
    }

    /// Sets a ceiling on concurrently running repository jobs.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }
}

impl Default for CollectorOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Collector
// ============================================================================

/// Drives a [`ConfigSource`] through a full account collection.
///
/// Contexts (with their variables) are listed first; repositories are then
/// fanned out with bounded concurrency and start jitter; the results are
/// aggregated into a [`Report`].
#[derive(Debug)]
pub struct Collector<S> {
    source: S,
    options: CollectorOptions,
    retry: RetryPolicy,
}

impl<S: ConfigSource> Collector<S> {
    /// Creates a collector with default options.
    pub fn new(source: S) -> Self {
        Self::with_options(source, CollectorOptions::default())
    }

    /// Creates a collector with explicit fan-out options.
    pub fn with_options(source: S, options: CollectorOptions) -> Self {
        Self {
            source,
            options,
            retry: RetryPolicy::default(),
        }
    }

    /// Collects the full account inventory.
    ///
    /// Per-repository sub-fetch failures end up in the report's
    /// `unavailable` section; transport errors, failed listings, and
    /// unsupported pagination abort the run.
    ///
    /// # Errors
    ///
    /// Returns the first fatal [`FetchError`] encountered.
    #[instrument(skip(self, repos), fields(repos = repos.len()))]
    pub async fn collect(&self, owner_id: &str, repos: &[RepoId]) -> Result<Report, FetchError> {
        let contexts = self.collect_contexts(owner_id).await?;
        let outcomes = self.collect_projects(repos).await?;
        Ok(aggregate::build_report(contexts, outcomes))
    }

    /// Lists the account's contexts, then every context's variables
    /// (concurrently across contexts).
    ///
    /// # Errors
    ///
    /// Any listing failure is fatal; contexts are foundational input and a
    /// partial listing would silently shrink the report.
    pub async fn collect_contexts(&self, owner_id: &str) -> Result<Vec<ContextData>, FetchError> {
        let retry = &self.retry;
        let source = &self.source;

        let contexts = collect_pages(|token| async move {
            with_rate_limit_retry(retry, || source.contexts_page(owner_id, token.as_deref())).await
        })
        .await?;
        info!(contexts = contexts.len(), "Listed contexts");

        let jobs = contexts.into_iter().map(|context| async move {
            let variables = self.context_variables(&context.id).await?;
            Ok::<_, FetchError>(ContextData::new(context, variables))
        });
        try_join_all(jobs).await
    }

    /// Lists one context's variables through the paginator.
    async fn context_variables(
        &self,
        context_id: &str,
    ) -> Result<Vec<ContextVariable>, FetchError> {
        let retry = &self.retry;
        let source = &self.source;

        collect_pages(|token| async move {
            with_rate_limit_retry(retry, || {
                source.context_variables_page(context_id, token.as_deref())
            })
            .await
        })
        .await
    }

    /// Runs a job for every repository, at most `concurrency` at a time.
    ///
    /// Outcomes arrive in completion order, which the random start jitter
    /// makes non-deterministic.
    ///
    /// # Errors
    ///
    /// The first job to hit a fatal condition aborts the fan-out.
    pub async fn collect_projects(
        &self,
        repos: &[RepoId],
    ) -> Result<Vec<ProjectOutcome>, FetchError> {
        if repos.is_empty() {
            return Ok(Vec::new());
        }

        let concurrency = self.options.concurrency.unwrap_or(repos.len()).max(1);
        info!(
            repos = repos.len(),
            concurrency, "Collecting project configuration"
        );

        stream::iter(repos.iter().cloned().map(|repo| self.collect_project(repo)))
            .buffer_unordered(concurrency)
            .try_collect()
            .await
    }

    /// Collects one repository's configuration: project variables, SSH
    /// checkout keys, and additional SSH keys, each retried independently
    /// on rate limiting.
    ///
    /// # Errors
    ///
    /// Transport errors are fatal, as is a checkout-key listing that asks
    /// for pagination the engine does not support. Non-success statuses are
    /// not errors; they are recorded in the outcome.
    #[instrument(skip(self), fields(repo = %repo))]
    pub async fn collect_project(&self, repo: RepoId) -> Result<ProjectOutcome, FetchError> {
        self.start_jitter().await;

        let retry = &self.retry;
        let source = &self.source;

        let variables = SubFetch::from_page(
            with_rate_limit_retry(retry, || source.project_variables(&repo)).await?,
        );

        let checkout_response =
            with_rate_limit_retry(retry, || source.checkout_keys(&repo)).await?;
        if checkout_response.is_success()
            && checkout_response
                .body
                .as_ref()
                .is_some_and(|page| page.has_more())
        {
            // Truncating the key list would hide keys from the inventory.
            return Err(FetchError::UnsupportedPagination {
                operation: SubFetchKind::CheckoutKeys.label().to_string(),
            });
        }
        let checkout_keys = SubFetch::from_page(checkout_response);

        let additional_keys = SubFetch::from_items(
            with_rate_limit_retry(retry, || source.additional_ssh_keys(&repo)).await?,
        );

        let outcome = ProjectOutcome {
            repo,
            variables,
            checkout_keys,
            additional_keys,
        };

        let failures = outcome.failure_reasons();
        if failures.is_empty() {
            debug!("Repository configuration collected");
        } else {
            warn!(
                failures = failures.len(),
                "Repository configuration partially unavailable"
            );
        }
        Ok(outcome)
    }

    /// Sleeps a uniformly random delay below the jitter cap, spreading out
    /// jobs that would otherwise hit the API in one burst.
    async fn start_jitter(&self) {
        let max_ms = u64::try_from(self.options.max_jitter.as_millis()).unwrap_or(u64::MAX);
        if max_ms == 0 {
            return;
        }
        let delay_ms = rand::thread_rng().gen_range(0..max_ms);
        sleep(Duration::from_millis(delay_ms)).await;
    }
}

// ============================================================================
// Tests
// ============================================================================
