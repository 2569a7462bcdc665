// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Retry logic with exponential backoff for Google API calls.
//!
//! This module provides utilities for retrying transient API errors (429, 5xx,
//! connection failures) with exponential backoff, while failing fast on permanent
//! errors (4xx client errors). It also provides the non-jittered backoff used to
//! space out change-status polls.

use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::constants::{CHANGE_POLL_MAX_INTERVAL_SECS, CHANGE_POLL_MIN_INTERVAL_SECS};
use crate::dns_errors::ApiError;
use crate::metrics::record_api_retry;

/// Backoff multiplier (exponential growth factor)
const BACKOFF_MULTIPLIER: f64 = 2.0;

/// Randomization factor to prevent thundering herd (±10%)
const RANDOMIZATION_FACTOR: f64 = 0.1;

/// API retry initial interval (500ms)
const API_INITIAL_INTERVAL_MILLIS: u64 = 500;

/// API retry maximum interval (10 seconds)
const API_MAX_INTERVAL_SECS: u64 = 10;

/// API retry maximum elapsed time (2 minutes)
const API_MAX_ELAPSED_TIME_SECS: u64 = 120;

/// Read-back initial interval (1 second)
const READ_BACK_INITIAL_INTERVAL_SECS: u64 = 1;

/// Read-back maximum interval (5 seconds)
const READ_BACK_MAX_INTERVAL_SECS: u64 = 5;

/// Read-back maximum elapsed time (30 seconds)
const READ_BACK_MAX_ELAPSED_TIME_SECS: u64 = 30;

/// Simple exponential backoff implementation.
///
/// Provides exponential backoff with optional randomization (jitter).
#[derive(Debug)]
pub struct ExponentialBackoff {
    /// Current interval duration
    pub current_interval: Duration,
    /// Initial interval duration
    pub initial_interval: Duration,
    /// Maximum interval duration
    pub max_interval: Duration,
    /// Maximum total elapsed time
    pub max_elapsed_time: Option<Duration>,
    /// Backoff multiplier (typically 2.0 for doubling)
    pub multiplier: f64,
    /// Randomization factor (e.g., 0.1 for ±10%)
    pub randomization_factor: f64,
    /// Start time for tracking total elapsed time
    start_time: Instant,
}

impl ExponentialBackoff {
    /// Create a new exponential backoff with specified parameters.
    #[must_use]
    pub fn new(
        initial_interval: Duration,
        max_interval: Duration,
        max_elapsed_time: Option<Duration>,
        multiplier: f64,
        randomization_factor: f64,
    ) -> Self {
        Self {
            current_interval: initial_interval,
            initial_interval,
            max_interval,
            max_elapsed_time,
            multiplier,
            randomization_factor,
            start_time: Instant::now(),
        }
    }

    /// Get the next backoff interval, or None if max elapsed time exceeded.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        if let Some(max_elapsed) = self.max_elapsed_time {
            if self.start_time.elapsed() >= max_elapsed {
                return None;
            }
        }

        let interval = self.current_interval;
        let jittered = self.apply_jitter(interval);

        let next = interval.as_secs_f64() * self.multiplier;
        self.current_interval = Duration::from_secs_f64(next).min(self.max_interval);

        Some(jittered)
    }

    /// Apply randomization (jitter) to an interval.
    fn apply_jitter(&self, interval: Duration) -> Duration {
        if self.randomization_factor == 0.0 {
            return interval;
        }

        let secs = interval.as_secs_f64();
        let delta = secs * self.randomization_factor;
        let min = secs - delta;
        let max = secs + delta;

        let jittered = rand::rng().random_range(min..=max);

        Duration::from_secs_f64(jittered.max(0.0))
    }
}

/// Create exponential backoff configuration for Google API request retries.
///
/// # Configuration
///
/// - **Initial interval**: 500ms
/// - **Max interval**: 10 seconds
/// - **Max elapsed time**: 2 minutes total
/// - **Multiplier**: 2.0 (exponential growth)
/// - **Randomization**: ±10% (prevents thundering herd)
///
/// # Retry Schedule
///
/// With these settings, retries occur at approximately:
///
/// 1. 500ms
/// 2. 1s
/// 3. 2s
/// 4. 4s
/// 5. 8s
/// 6. 10s (capped at max interval)
///    7-16. 10s intervals until 2 minutes elapsed
#[must_use]
pub fn http_backoff() -> ExponentialBackoff {
    ExponentialBackoff::new(
        Duration::from_millis(API_INITIAL_INTERVAL_MILLIS),
        Duration::from_secs(API_MAX_INTERVAL_SECS),
        Some(Duration::from_secs(API_MAX_ELAPSED_TIME_SECS)),
        BACKOFF_MULTIPLIER,
        RANDOMIZATION_FACTOR,
    )
}

/// Create the backoff that spaces change-status polls.
///
/// Starts at 2 seconds and doubles up to 10 seconds, with no jitter and no elapsed
/// limit. The change waiter enforces its own deadline.
#[must_use]
pub fn change_poll_backoff() -> ExponentialBackoff {
    ExponentialBackoff::new(
        Duration::from_secs(CHANGE_POLL_MIN_INTERVAL_SECS),
        Duration::from_secs(CHANGE_POLL_MAX_INTERVAL_SECS),
        None,
        BACKOFF_MULTIPLIER,
        0.0,
    )
}

/// Create the backoff used to re-read a record set after its change is `done`.
///
/// Listing can briefly lag behind a completed change. Starts at 1 second and
/// doubles up to 5 seconds, without jitter, giving up after 30 seconds.
#[must_use]
pub fn read_back_backoff() -> ExponentialBackoff {
    ExponentialBackoff::new(
        Duration::from_secs(READ_BACK_INITIAL_INTERVAL_SECS),
        Duration::from_secs(READ_BACK_MAX_INTERVAL_SECS),
        Some(Duration::from_secs(READ_BACK_MAX_ELAPSED_TIME_SECS)),
        BACKOFF_MULTIPLIER,
        0.0,
    )
}

/// Determine if an HTTP status code is retryable.
///
/// # Retryable Status Codes
///
/// - **429** (Too Many Requests) - Rate limiting
/// - **500** (Internal Server Error) - Server error
/// - **502** (Bad Gateway) - Proxy/gateway error
/// - **503** (Service Unavailable) - Temporary unavailability
/// - **504** (Gateway Timeout) - Gateway timeout
#[must_use]
pub fn is_retryable_http_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Retry a Google API call with exponential backoff.
///
/// Automatically retries on transient errors (HTTP 429, 5xx, connection failures)
/// and fails immediately on permanent errors.
///
/// # Arguments
///
/// * `backoff` - Retry schedule, usually [`http_backoff`]
/// * `operation` - Async function that performs the API call
/// * `operation_name` - Human-readable name for logging (e.g., "create change")
///
/// # Errors
///
/// Returns the error itself if it is not retryable, or
/// [`ApiError::RetriesExhausted`] carrying the attempt count once the backoff
/// budget is spent.
pub async fn retry_api_call<T, F, Fut>(
    mut backoff: ExponentialBackoff,
    mut operation: F,
    operation_name: &str,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let start_time = Instant::now();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(
                        operation = operation_name,
                        attempt = attempt,
                        elapsed = ?start_time.elapsed(),
                        "Google API call succeeded after retries"
                    );
                }
                return Ok(value);
            }
            Err(e) => {
                if !e.is_retryable() {
                    error!(
                        operation = operation_name,
                        error = %e,
                        "Non-retryable Google API error, failing immediately"
                    );
                    return Err(e);
                }

                if let Some(duration) = backoff.next_backoff() {
                    warn!(
                        operation = operation_name,
                        attempt = attempt,
                        retry_after = ?duration,
                        error = %e,
                        "Retryable Google API error, will retry"
                    );
                    record_api_retry(operation_name);
                    tokio::time::sleep(duration).await;
                } else {
                    error!(
                        operation = operation_name,
                        attempt = attempt,
                        elapsed = ?start_time.elapsed(),
                        error = %e,
                        "Backoff exhausted, giving up"
                    );
                    return Err(ApiError::RetriesExhausted {
                        attempts: attempt,
                        last_error: e.to_string(),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod retry_tests;
