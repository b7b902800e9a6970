use anyhow::{anyhow, Result};
use azure_events::retry::{is_transient, with_exponential_backoff, RetryConfig, UnexpectedStatus};
use reqwest::StatusCode;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

fn fast_config(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        initial_backoff_ms: 5,
        backoff_factor: 2.0,
        max_backoff_ms: 20,
        add_jitter: false,
    }
}

#[tokio::test]
async fn test_successful_operation_returns_immediately() -> Result<()> {
    let calls = AtomicU32::new(0);

    let result = with_exponential_backoff(
        || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, anyhow::Error>("token")
        },
        |_| true,
        &fast_config(3),
    )
    .await?;

    assert_eq!(result, "token");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_retries_until_success() -> Result<()> {
    let calls = AtomicU32::new(0);

    let result = with_exponential_backoff(
        || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(anyhow::Error::new(UnexpectedStatus(StatusCode::SERVICE_UNAVAILABLE)))
            } else {
                Ok(201)
            }
        },
        is_transient,
        &fast_config(3),
    )
    .await?;

    assert_eq!(result, 201);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    Ok(())
}

#[tokio::test]
async fn test_stops_after_max_attempts() {
    let calls = AtomicU32::new(0);

    let result: Result<i32> = with_exponential_backoff(
        || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(anyhow!("still throttled"))
        },
        |_| true,
        &fast_config(2),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_non_retriable_error_fails_fast() {
    let calls = AtomicU32::new(0);

    let result: Result<i32> = with_exponential_backoff(
        || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(anyhow::Error::new(UnexpectedStatus(StatusCode::UNAUTHORIZED)))
        },
        is_transient,
        &fast_config(5),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_delay_schedule_is_exponential_and_capped() {
    let config = RetryConfig {
        max_attempts: 6,
        initial_backoff_ms: 100,
        backoff_factor: 3.0,
        max_backoff_ms: 1_000,
        add_jitter: false,
    };

    assert_eq!(config.delay_for(1), Duration::from_millis(100));
    assert_eq!(config.delay_for(2), Duration::from_millis(300));
    assert_eq!(config.delay_for(3), Duration::from_millis(900));
    assert_eq!(config.delay_for(4), Duration::from_millis(1_000));
    assert_eq!(config.delay_for(5), Duration::from_millis(1_000));
}

#[test]
fn test_transient_classification() {
    assert!(is_transient(&anyhow::Error::new(UnexpectedStatus(StatusCode::TOO_MANY_REQUESTS))));
    assert!(is_transient(&anyhow::Error::new(UnexpectedStatus(StatusCode::BAD_GATEWAY))));
    assert!(!is_transient(&anyhow::Error::new(UnexpectedStatus(StatusCode::BAD_REQUEST))));
    assert!(!is_transient(&anyhow::Error::new(UnexpectedStatus(StatusCode::FORBIDDEN))));
    assert!(!is_transient(&anyhow!("malformed response")));
}

#[test]
fn test_no_retry_config_is_single_attempt() {
    let config = RetryConfig::none();
    assert_eq!(config.max_attempts, 1);
    assert_eq!(config.delay_for(1), Duration::ZERO);
}
