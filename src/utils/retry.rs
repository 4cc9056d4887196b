//! Retry policy with exponential backoff
//!
//! The HTTP fetcher uses [`RetryPolicy`] to decide which responses are
//! transient and how long to back off between attempts. The delay grows as
//! `backoff_factor * 2^(attempt - 1)` seconds, the same curve a browser-like
//! session adapter would apply.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Status codes retried by default
pub const DEFAULT_RETRY_STATUSES: &[u16] = &[408, 429, 500, 502, 503, 504];

/// Upper bound for a single backoff sleep
const MAX_BACKOFF: Duration = Duration::from_secs(120);

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,

    /// Backoff factor in seconds
    pub backoff_factor: f64,

    /// HTTP status codes that trigger a retry
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: 1.0,
            retry_statuses: DEFAULT_RETRY_STATUSES.to_vec(),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the default status set
    pub fn new(max_retries: u32, backoff_factor: f64) -> Self {
        Self {
            max_retries,
            backoff_factor,
            ..Default::default()
        }
    }

    /// Replace the retryable status set
    #[must_use]
    pub fn with_statuses(mut self, statuses: &[u16]) -> Self {
        self.retry_statuses = statuses.to_vec();
        self
    }

    /// Whether a response status should be retried
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Delay before the given retry attempt (attempt 0 is the first request)
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        if attempt == 0 || self.backoff_factor <= 0.0 {
            return Duration::ZERO;
        }

        let exponent = (attempt - 1).min(16) as i32;
        let secs = self.backoff_factor * 2f64.powi(exponent);
        Duration::from_secs_f64(secs).min(MAX_BACKOFF)
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// the policy's retries are spent.
///
/// Returns the successful value, or the last error together with the number
/// of attempts made.
///
/// # Example
///
/// ```no_run
/// use cekfakta::utils::retry::{retry_if, RetryPolicy};
///
/// # async fn example() {
/// let policy = RetryPolicy::new(3, 0.5);
/// let result: Result<u32, (String, u32)> = retry_if(
///     &policy,
///     || async { Err::<u32, String>("temporary".into()) },
///     |e| e.contains("temporary"),
/// )
/// .await;
/// assert_eq!(result.unwrap_err().1, 4);
/// # }
/// ```
pub async fn retry_if<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    mut operation: F,
    should_retry: P,
) -> Result<T, (E, u32)>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut attempt = 0;

    loop {
        if attempt > 0 {
            let delay = policy.backoff_delay(attempt);
            debug!(
                attempt = attempt,
                delay_ms = delay.as_millis() as u64,
                "Retrying after backoff"
            );
            tokio::time::sleep(delay).await;
        }

        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(attempt = attempt, "Succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) => {
                if !should_retry(&e) {
                    return Err((e, attempt + 1));
                }
                if attempt >= policy.max_retries {
                    warn!(
                        attempts = attempt + 1,
                        error = %e,
                        "Retries exhausted"
                    );
                    return Err((e, attempt + 1));
                }
                debug!(attempt = attempt, error = %e, "Transient failure");
                attempt += 1;
            }
        }
    }
}
