// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `change_waiter.rs`

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::super::{wait_for_change, WaitConfig};
    use crate::api::memory::InMemoryDnsApi;
    use crate::api::{Change, ChangeStatus, DnsApi};
    use crate::dns_errors::DnsError;

    const PROJECT: &str = "my-project";
    const ZONE: &str = "prod-zone";

    async fn api_with_change() -> (InMemoryDnsApi, String) {
        let api = InMemoryDnsApi::new().with_zone(PROJECT, ZONE, "example.com.");
        let change = api
            .create_change(PROJECT, ZONE, &Change::default())
            .await
            .unwrap();
        (api, change.id.unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_pending_done_takes_three_polls() {
        let (api, change_id) = api_with_change().await;
        api.script_change_statuses([ChangeStatus::Pending, ChangeStatus::Pending, ChangeStatus::Done]);

        let outcome = wait_for_change(&api, PROJECT, ZONE, &change_id, &WaitConfig::default())
            .await
            .unwrap();

        assert_eq!(outcome.polls, 3);
        assert_eq!(api.get_change_calls(), 3);
        assert_eq!(outcome.change.status, Some(ChangeStatus::Done));
        // Sleeps of 2s then 4s between the polls
        assert_eq!(outcome.elapsed, Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_done_on_first_poll_does_not_sleep() {
        let (api, change_id) = api_with_change().await;

        let outcome = wait_for_change(&api, PROJECT, ZONE, &change_id, &WaitConfig::default())
            .await
            .unwrap();

        assert_eq!(outcome.polls, 1);
        assert_eq!(outcome.elapsed, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_done_times_out_at_deadline() {
        let (api, change_id) = api_with_change().await;
        api.script_change_statuses(std::iter::repeat_n(ChangeStatus::Pending, 100));
        let config = WaitConfig {
            timeout: Duration::from_secs(30),
        };

        let err = wait_for_change(&api, PROJECT, ZONE, &change_id, &config)
            .await
            .unwrap_err();

        match err {
            DnsError::Timeout {
                change_id: id,
                timeout_secs,
                last_status,
            } => {
                assert_eq!(id, change_id);
                assert_eq!(timeout_secs, 30);
                assert_eq!(last_status, "pending");
            }
            other => panic!("unexpected error: {other}"),
        }
        // Polls at 0s, 2s, 6s, 14s, 24s and a final one clamped to 30s
        assert_eq!(api.get_change_calls(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_status_aborts() {
        let (api, change_id) = api_with_change().await;
        api.script_change_statuses([ChangeStatus::Pending, ChangeStatus::Unknown]);

        let err = wait_for_change(&api, PROJECT, ZONE, &change_id, &WaitConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, DnsError::UnexpectedChangeStatus { ref status, .. } if status == "unknown"));
        assert_eq!(api.get_change_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_aborts_immediately() {
        let (api, _) = api_with_change().await;

        let err = wait_for_change(&api, PROJECT, ZONE, "missing", &WaitConfig::default())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(api.get_change_calls(), 1);
    }
}
