//! Bounded retry with exponential backoff.
//!
//! A generic wrapper for fallible async steps. It knows nothing about the
//! tracker domain; callers that must not repeat certain failures supply a
//! predicate via [`retry_if`].

use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Tuning knobs for one retry call site.
#[derive(Debug, Clone)]
pub struct RetryOptions {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each failed attempt.
    pub backoff_factor: f64,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1000),
            backoff_factor: 2.0,
        }
    }
}

/// Invokes `operation` until it succeeds or `max_attempts` is exhausted.
///
/// The delay before attempt k+1 is `initial_delay * backoff_factor^(k-1)`.
/// No jitter is applied; callers needing it must add their own. On
/// exhaustion the last error is returned unchanged, so the caller's error
/// handling is unaffected by retry mechanics.
///
/// # Errors
///
/// Returns the final attempt's error once all attempts are used up.
pub async fn retry<T, E, F, Fut>(operation: F, options: &RetryOptions) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    retry_if(operation, options, |_| true).await
}

/// Like [`retry`], but consults `should_retry` after each failure.
///
/// A `false` verdict stops immediately and returns that error, which is how
/// callers exempt permanent failures (e.g. a request the server explicitly
/// rejected) without teaching the retry loop about their domain.
///
/// The operation always runs at least once; `max_attempts: 0` is treated
/// as 1 rather than panicking on a constructible option set.
///
/// # Errors
///
/// Returns the first non-retryable error, or the final attempt's error once
/// all attempts are used up.
pub async fn retry_if<T, E, F, Fut, P>(
    mut operation: F,
    options: &RetryOptions,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let max_attempts = options.max_attempts.max(1);
    let mut delay = options.initial_delay;
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if attempt >= max_attempts || !should_retry(&error) {
                    return Err(error);
                }
                debug!(attempt, delay_ms = delay.as_millis() as u64, "Attempt failed, backing off");
                tokio::time::sleep(delay).await;
                delay = delay.mul_f64(options.backoff_factor);
                attempt += 1;
            }
        }
    }
}
