// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Blocking wait for a submitted Cloud DNS change.
//!
//! A change is polled immediately after submission and then on a 2s, 4s, 8s, 10s,
//! 10s... schedule until it reports `done`. The last sleep is clamped so the
//! waiter never oversleeps its deadline.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::api::{Change, ChangeStatus, DnsApi};
use crate::constants::CHANGE_WAIT_TIMEOUT_SECS;
use crate::dns_errors::DnsError;
use crate::metrics::record_change_wait;
use crate::reconcilers::retry::change_poll_backoff;

/// How long to wait for a change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitConfig {
    /// Total wait budget
    pub timeout: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(CHANGE_WAIT_TIMEOUT_SECS),
        }
    }
}

/// Result of a successful wait.
#[derive(Clone, Debug, PartialEq)]
pub struct WaitOutcome {
    /// The change as last read, with status `done`
    pub change: Change,
    /// Number of `get_change` calls made
    pub polls: u32,
    /// Time spent waiting
    pub elapsed: Duration,
}

/// Wait until change `change_id` in `project`/`managed_zone` is `done`.
///
/// # Errors
///
/// - [`DnsError::Timeout`] if the change is still pending when the budget runs out
/// - [`DnsError::UnexpectedChangeStatus`] for a status other than `pending` or `done`
/// - [`DnsError::Transport`] if a poll fails; polls are not retried here
pub async fn wait_for_change(
    api: &dyn DnsApi,
    project: &str,
    managed_zone: &str,
    change_id: &str,
    config: &WaitConfig,
) -> Result<WaitOutcome, DnsError> {
    let start = Instant::now();
    let deadline = start + config.timeout;
    let mut backoff = change_poll_backoff();
    let mut polls: u32 = 0;

    loop {
        polls += 1;
        let change = match api.get_change(project, managed_zone, change_id).await {
            Ok(change) => change,
            Err(e) => {
                record_change_wait("error", polls, start.elapsed());
                error!(
                    project = %project,
                    managed_zone = %managed_zone,
                    change_id = %change_id,
                    poll = polls,
                    error = %e,
                    "Failed to poll DNS change"
                );
                return Err(e.into());
            }
        };

        let status = match change.status {
            Some(ChangeStatus::Done) => {
                let elapsed = start.elapsed();
                record_change_wait("done", polls, elapsed);
                info!(
                    change_id = %change_id,
                    polls = polls,
                    elapsed_ms = elapsed.as_millis(),
                    "DNS change is done"
                );
                return Ok(WaitOutcome {
                    change,
                    polls,
                    elapsed,
                });
            }
            Some(ChangeStatus::Pending) => ChangeStatus::Pending,
            Some(ChangeStatus::Unknown) | None => {
                record_change_wait("unexpected", polls, start.elapsed());
                return Err(DnsError::UnexpectedChangeStatus {
                    change_id: change_id.to_string(),
                    status: change
                        .status
                        .map(ChangeStatus::as_str)
                        .unwrap_or_default()
                        .to_string(),
                });
            }
        };

        let now = Instant::now();
        if now >= deadline {
            record_change_wait("timeout", polls, start.elapsed());
            return Err(DnsError::Timeout {
                change_id: change_id.to_string(),
                timeout_secs: config.timeout.as_secs(),
                last_status: status.as_str().to_string(),
            });
        }

        let delay = backoff
            .next_backoff()
            .unwrap_or(backoff.max_interval)
            .min(deadline - now);
        debug!(
            change_id = %change_id,
            poll = polls,
            status = status.as_str(),
            delay_ms = delay.as_millis(),
            "DNS change still pending"
        );
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
#[path = "change_waiter_tests.rs"]
mod change_waiter_tests;
