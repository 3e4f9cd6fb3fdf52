//! Rate-limit retry with exponential backoff.
//!
//! CircleCI answers over-quota callers with 429 and sometimes a
//! `Retry-After` hint. Every endpoint shares that quota, so the schedule is
//! one process-wide policy rather than a per-call knob: the engine retries
//! with the server's hint when it is usable and exponential backoff when it
//! is not.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::error::FetchError;
use crate::source::ApiResponse;

// ============================================================================
// Retry Policy
// ============================================================================

/// Backoff schedule for rate-limited requests.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// First wait, in seconds.
    pub initial_wait_secs: u64,
    /// Multiplier applied to the wait after each attempt.
    pub multiplier: u64,
    /// Ceiling for the computed wait, in seconds.
    pub max_wait_secs: u64,
    /// Total attempt budget, including the first call.
    pub max_attempts: u32,
}

impl RetryPolicy {
    /// The standard schedule: 1s doubling to a 300s ceiling, 30 attempts.
    pub const fn new() -> Self {
        Self {
            initial_wait_secs: 1,
            multiplier: 2,
            max_wait_secs: 300,
            max_attempts: 30,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Retry Loop
// ============================================================================

/// Runs `op` until it returns a response that is not rate-limited, or the
/// attempt budget is spent.
///
/// Each 429 below the budget sleeps for the server's `Retry-After` hint when
/// present and positive, otherwise the current backoff value; the backoff
/// value then advances (doubled, capped at the ceiling) whether or not the
/// hint was used. The final response is returned as-is, including a 429 on
/// the last permitted attempt. Transport errors from `op` propagate
/// immediately.
pub async fn with_rate_limit_retry<T, F, Fut>(
    policy: &RetryPolicy,
    mut op: F,
) -> Result<ApiResponse<T>, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<ApiResponse<T>, FetchError>>,
{
    let mut wait_secs = policy.initial_wait_secs;
    let mut attempt: u32 = 1;

    loop {
        let response = op().await?;
        if !response.is_rate_limited() || attempt >= policy.max_attempts {
            return Ok(response);
        }

        let hint = response.retry_after.filter(|secs| *secs > 0);
        let delay_secs = hint.unwrap_or(wait_secs);
        warn!(
            attempt,
            delay_secs,
            hinted = hint.is_some(),
            "Rate limited, waiting before retry"
        );
        sleep(Duration::from_secs(delay_secs)).await;

        wait_secs = wait_secs
            .saturating_mul(policy.multiplier)
            .min(policy.max_wait_secs);
        attempt += 1;
    }
}

// ============================================================================
// Tests
// ============================================================================
