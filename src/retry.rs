//! Exponential backoff for calls to Azure endpoints
//!
//! Directory lookups, token requests and alert rule submissions are retried
//! when they fail for reasons that usually clear up on their own: timeouts,
//! refused connections, throttling (429) and server errors (5xx).

use anyhow::Result;
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Backoff parameters.
///
/// # Examples
///
/// ```
/// use azure_events::retry::RetryConfig;
///
/// let config = RetryConfig {
///     max_attempts: 5,
///     add_jitter: false,
///     ..RetryConfig::default()
/// };
/// assert_eq!(config.delay_for(1).as_millis(), 200);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub backoff_factor: f64,
    pub max_backoff_ms: u64,
    /// Scale each delay by a random factor in 0.9..1.1
    pub add_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 200,
            backoff_factor: 2.0,
            max_backoff_ms: 5_000,
            add_jitter: true,
        }
    }
}

impl RetryConfig {
    /// Single attempt, no waiting.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff_ms: 0,
            backoff_factor: 1.0,
            max_backoff_ms: 0,
            add_jitter: false,
        }
    }

    /// Delay before retry number `attempt` (1-based), without jitter.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let raw = self.initial_backoff_ms as f64 * self.backoff_factor.powi(exponent);
        Duration::from_millis((raw as u64).min(self.max_backoff_ms))
    }

    fn jittered(&self, delay: Duration) -> Duration {
        if !self.add_jitter {
            return delay;
        }
        let factor = rand::random::<f64>() * 0.2 + 0.9;
        let ms = (delay.as_millis() as f64 * factor) as u64;
        Duration::from_millis(ms.min(self.max_backoff_ms))
    }
}

/// Runs `operation` until it succeeds, fails with a non-retriable error, or
/// `config.max_attempts` attempts have been made. Returns the last result.
pub async fn with_exponential_backoff<F, Fut, T, E, R>(
    operation: F,
    is_retriable: R,
    config: &RetryConfig,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
{
    let mut attempt = 0;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        attempt += 1;
        if attempt >= config.max_attempts || !is_retriable(&err) {
            return Err(err);
        }

        let delay = config.jittered(config.delay_for(attempt));
        debug!(attempt, max = config.max_attempts, delay_ms = delay.as_millis() as u64, "retrying request");
        sleep(delay).await;
    }
}

/// Status codes worth retrying: throttling and server errors.
pub fn is_retriable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Classifies an error produced by the HTTP layer.
pub fn is_transient(err: &anyhow::Error) -> bool {
    if let Some(status) = err.downcast_ref::<UnexpectedStatus>() {
        return is_retriable_status(status.0);
    }

    err.chain()
        .filter_map(|cause| cause.downcast_ref::<reqwest::Error>())
        .any(|e| {
            e.is_timeout() || e.is_connect() || e.status().map(is_retriable_status).unwrap_or(false)
        })
}

/// A response arrived with a non-success status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("request failed with status {0}")]
pub struct UnexpectedStatus(pub StatusCode);
