// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `record_set.rs`

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::{DeleteOutcome, Plan, RecordSetReconciler};
    use crate::api::memory::InMemoryDnsApi;
    use crate::api::types::ResourceRecordSet;
    use crate::constants::DEFAULT_COMPUTE_BASE_PATH;
    use crate::dns_errors::{ApiError, DnsError};
    use crate::model::{
        HealthCheckedTargets, IpProtocol, LoadBalancerTarget, LoadBalancerType, RecordData,
        RecordSet, RecordSetKey, RoutingPolicy, WrrItem,
    };

    const PROJECT: &str = "my-project";
    const ZONE: &str = "prod-zone";

    fn setup() -> (Arc<InMemoryDnsApi>, RecordSetReconciler) {
        let api = Arc::new(InMemoryDnsApi::new().with_zone(PROJECT, ZONE, "example.com."));
        let reconciler = RecordSetReconciler::new(api.clone(), DEFAULT_COMPUTE_BASE_PATH);
        (api, reconciler)
    }

    fn key(name: &str, record_type: &str) -> RecordSetKey {
        RecordSetKey {
            project: PROJECT.to_string(),
            managed_zone: ZONE.to_string(),
            name: name.to_string(),
            record_type: record_type.to_string(),
        }
    }

    fn record(name: &str, record_type: &str, ttl: i64, rrdatas: &[&str]) -> RecordSet {
        RecordSet {
            key: key(name, record_type),
            ttl: Some(ttl),
            data: RecordData::Rrdatas(rrdatas.iter().map(|r| (*r).to_string()).collect()),
        }
    }

    fn wire(name: &str, record_type: &str, ttl: i64, rrdatas: &[&str]) -> ResourceRecordSet {
        ResourceRecordSet {
            name: name.to_string(),
            record_type: record_type.to_string(),
            ttl,
            rrdatas: rrdatas.iter().map(|r| (*r).to_string()).collect(),
            ..ResourceRecordSet::default()
        }
    }

    #[tokio::test]
    async fn test_create_in_empty_zone_adds_exactly_desired() {
        let (api, reconciler) = setup();
        let desired = record("test.example.com.", "A", 300, &["192.168.1.1"]);

        let created = reconciler.create(&desired).await.unwrap();

        let changes = api.submitted_changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes[0].additions,
            vec![wire("test.example.com.", "A", 300, &["192.168.1.1"])]
        );
        assert!(changes[0].deletions.is_empty());
        assert_eq!(created, desired);
        assert_eq!(
            reconciler.read(&desired.key).await.unwrap(),
            Some(desired.clone())
        );
    }

    #[tokio::test]
    async fn test_create_twice_leaves_one_record_set() {
        let (api, reconciler) = setup();
        let desired = record("test.example.com.", "A", 300, &["192.168.1.1"]);

        reconciler.create(&desired).await.unwrap();
        reconciler.create(&desired).await.unwrap();

        let rrsets = api.record_sets(PROJECT, ZONE);
        assert_eq!(rrsets.len(), 1);
        let changes = api.submitted_changes();
        let second = &changes[1];
        assert_eq!(second.deletions.len(), 1);
        assert_eq!(second.additions.len(), 1);
    }

    #[tokio::test]
    async fn test_create_replaces_only_matching_type() {
        let (api, reconciler) = setup();
        api.insert_record_set(PROJECT, ZONE, wire("test.example.com.", "A", 60, &["10.0.0.1"]));
        api.insert_record_set(PROJECT, ZONE, wire("test.example.com.", "TXT", 60, &["\"v=1\""]));

        reconciler
            .create(&record("test.example.com.", "A", 300, &["10.0.0.2"]))
            .await
            .unwrap();

        let changes = api.submitted_changes();
        let change = &changes[0];
        assert_eq!(change.deletions, vec![wire("test.example.com.", "A", 60, &["10.0.0.1"])]);
        assert_eq!(api.record_sets(PROJECT, ZONE).len(), 2);
    }

    #[tokio::test]
    async fn test_read_missing_record_is_none() {
        let (_, reconciler) = setup();
        let found = reconciler
            .read(&key("missing.example.com.", "A"))
            .await
            .unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_read_ambiguous_uses_first() {
        let (api, reconciler) = setup();
        api.insert_record_set(PROJECT, ZONE, wire("dup.example.com.", "A", 60, &["10.0.0.1"]));
        api.insert_record_set(PROJECT, ZONE, wire("dup.example.com.", "A", 60, &["10.0.0.2"]));

        let found = reconciler
            .read(&key("dup.example.com.", "A"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.rrdatas(), ["10.0.0.1".to_string()]);
    }

    #[tokio::test]
    async fn test_update_deletes_prior_as_recorded() {
        let (api, reconciler) = setup();
        let prior = reconciler
            .create(&record("www.example.com.", "A", 300, &["10.0.0.1"]))
            .await
            .unwrap();
        let desired = record("www.example.com.", "A", 600, &["10.0.0.1", "10.0.0.2"]);

        let updated = reconciler.update(&prior, &desired).await.unwrap();

        let changes = api.submitted_changes();
        let change = &changes[1];
        assert_eq!(change.deletions, vec![wire("www.example.com.", "A", 300, &["10.0.0.1"])]);
        assert_eq!(change.additions[0].ttl, 600);
        assert_eq!(updated, desired);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_read_back_waits_for_listing() {
        let (api, reconciler) = setup();
        let prior = reconciler
            .create(&record("www.example.com.", "A", 300, &["10.0.0.1"]))
            .await
            .unwrap();
        let desired = record("www.example.com.", "A", 600, &["10.0.0.2"]);
        let lists_before = api.list_calls();
        api.hide_next_lists(2);

        let updated = reconciler.update(&prior, &desired).await.unwrap();

        assert_eq!(updated, desired);
        assert_eq!(api.list_calls() - lists_before, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_read_back_gives_up() {
        let (api, reconciler) = setup();
        let prior = reconciler
            .create(&record("www.example.com.", "A", 300, &["10.0.0.1"]))
            .await
            .unwrap();
        api.hide_next_lists(usize::MAX);

        let err = reconciler
            .update(&prior, &record("www.example.com.", "A", 600, &["10.0.0.2"]))
            .await
            .unwrap_err();

        assert!(matches!(err, DnsError::NotFound(_)));
        // The change itself went through.
        assert_eq!(api.record_sets(PROJECT, ZONE)[0].ttl, 600);
    }

    #[tokio::test]
    async fn test_update_rejects_rename() {
        let (_, reconciler) = setup();
        let prior = record("a.example.com.", "A", 300, &["10.0.0.1"]);
        let desired = record("b.example.com.", "A", 300, &["10.0.0.1"]);

        let err = reconciler.update(&prior, &desired).await.unwrap_err();
        assert!(matches!(err, DnsError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_apex_ns_is_skipped() {
        let (api, reconciler) = setup();
        api.insert_record_set(
            PROJECT,
            ZONE,
            wire("example.com.", "NS", 21600, &["ns-cloud-a1.googledomains.com."]),
        );
        let apex = record("example.com.", "NS", 21600, &["ns-cloud-a1.googledomains.com."]);

        let outcome = reconciler.delete(&apex).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::SkippedApexNs);
        assert!(api.submitted_changes().is_empty());
        assert_eq!(api.record_sets(PROJECT, ZONE).len(), 1);
    }

    #[tokio::test]
    async fn test_delete_subdomain_ns() {
        let (api, reconciler) = setup();
        api.insert_record_set(
            PROJECT,
            ZONE,
            wire("sub.example.com.", "NS", 300, &["ns1.sub.example.com."]),
        );
        let delegation = record("sub.example.com.", "NS", 300, &["ns1.sub.example.com."]);

        let outcome = reconciler.delete(&delegation).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(api.submitted_changes().len(), 1);
        assert!(api.record_sets(PROJECT, ZONE).is_empty());
    }

    #[tokio::test]
    async fn test_delete_already_gone_is_deleted() {
        let (api, reconciler) = setup();
        let gone = record("gone.example.com.", "A", 300, &["10.0.0.1"]);

        let outcome = reconciler.delete(&gone).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(api.get_change_calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_propagates_other_errors() {
        let (api, reconciler) = setup();
        api.fail_next_create(ApiError::Http {
            status: 403,
            url: "changes".to_string(),
            message: "forbidden".to_string(),
        });

        let err = reconciler
            .delete(&record("x.example.com.", "A", 300, &["10.0.0.1"]))
            .await
            .unwrap_err();
        assert_eq!(err.status_reason(), crate::status_reasons::REASON_API_AUTH_FAILED);
    }

    #[tokio::test]
    async fn test_import_with_default_project() {
        let (api, reconciler) = setup();
        api.insert_record_set(PROJECT, ZONE, wire("test.example.com.", "A", 300, &["192.168.1.1"]));

        let imported = reconciler
            .import("prod-zone/test.example.com./A", Some(PROJECT))
            .await
            .unwrap();

        assert_eq!(imported, record("test.example.com.", "A", 300, &["192.168.1.1"]));
    }

    #[tokio::test]
    async fn test_import_missing_is_not_found() {
        let (_, reconciler) = setup();
        let err = reconciler
            .import(
                "projects/my-project/managedZones/prod-zone/rrsets/none.example.com./A",
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DnsError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_import_bad_id() {
        let (_, reconciler) = setup();
        let err = reconciler.import("just-one-part", None).await.unwrap_err();
        assert!(matches!(err, DnsError::ImportId(_)));
    }

    #[tokio::test]
    async fn test_routing_policy_network_is_expanded() {
        let (api, reconciler) = setup();
        let desired = RecordSet {
            key: key("lb.example.com.", "A"),
            ttl: Some(30),
            data: RecordData::RoutingPolicy(RoutingPolicy::WeightedRoundRobin(vec![WrrItem {
                weight: 1.0,
                rrdatas: vec![],
                health_checked_targets: Some(HealthCheckedTargets {
                    internal_load_balancers: vec![LoadBalancerTarget {
                        load_balancer_type: LoadBalancerType::RegionalL4Ilb,
                        ip_address: "10.128.0.5".to_string(),
                        port: "80".to_string(),
                        ip_protocol: IpProtocol::Tcp,
                        network_url: "default".to_string(),
                        project: PROJECT.to_string(),
                        region: Some("us-east1".to_string()),
                    }],
                }),
            }])),
        };

        let created = reconciler.create(&desired).await.unwrap();

        let rrsets = api.record_sets(PROJECT, ZONE);
        let stored = &rrsets[0];
        let policy = stored.routing_policy.as_ref().unwrap();
        let items = &policy.wrr.as_ref().unwrap().items;
        let targets = items[0].health_checked_targets.as_ref().unwrap();
        assert_eq!(
            targets.internal_load_balancers[0].network_url,
            "https://compute.googleapis.com/compute/v1/projects/my-project/global/networks/default"
        );
        assert!(stored.rrdatas.is_empty());
        assert_eq!(created.routing_policy().map(RoutingPolicy::kind), Some("wrr"));
    }

    #[test]
    fn test_plan() {
        let prior = record("t.example.com.", "TXT", 300, &["\"Hello\""]);

        assert_eq!(RecordSetReconciler::plan(None, &prior), Plan::Create);
        assert_eq!(
            RecordSetReconciler::plan(
                Some(&prior),
                &record("t.example.com.", "TXT", 300, &["hello"])
            ),
            Plan::NoOp
        );
        assert_eq!(
            RecordSetReconciler::plan(
                Some(&prior),
                &record("t.example.com.", "TXT", 600, &["hello"])
            ),
            Plan::Update
        );
        assert_eq!(
            RecordSetReconciler::plan(
                Some(&prior),
                &record("t.example.com.", "SPF", 300, &["hello"])
            ),
            Plan::Update
        );
        assert_eq!(
            RecordSetReconciler::plan(
                Some(&prior),
                &record("u.example.com.", "TXT", 300, &["hello"])
            ),
            Plan::Replace
        );
    }

    #[tokio::test]
    async fn test_apply_noop_submits_nothing() {
        let (api, reconciler) = setup();
        let desired = record("test.example.com.", "A", 300, &["192.168.1.1"]);
        let state = reconciler.apply(None, &desired).await.unwrap();

        let again = reconciler.apply(Some(&state), &desired).await.unwrap();

        assert_eq!(again, state);
        assert_eq!(api.submitted_changes().len(), 1);
    }

    #[tokio::test]
    async fn test_apply_replace_moves_record() {
        let (api, reconciler) = setup();
        let state = reconciler
            .apply(None, &record("old.example.com.", "A", 300, &["10.0.0.1"]))
            .await
            .unwrap();
        let desired = record("new.example.com.", "A", 300, &["10.0.0.1"]);

        let moved = reconciler.apply(Some(&state), &desired).await.unwrap();

        assert_eq!(moved, desired);
        let rrsets = api.record_sets(PROJECT, ZONE);
        assert_eq!(rrsets.len(), 1);
        assert_eq!(rrsets[0].name, "new.example.com.");
    }

    #[tokio::test]
    async fn test_apply_recreates_record_deleted_out_of_band() {
        let (api, reconciler) = setup();
        let desired = record("test.example.com.", "A", 300, &["192.168.1.1"]);
        let state = reconciler.apply(None, &desired).await.unwrap();
        api.remove_record_set(PROJECT, ZONE, "test.example.com.", "A");

        let again = reconciler.apply(Some(&state), &desired).await.unwrap();

        assert_eq!(again, desired);
        assert_eq!(
            api.record_sets(PROJECT, ZONE),
            vec![wire("test.example.com.", "A", 300, &["192.168.1.1"])]
        );
        let changes = api.submitted_changes();
        assert_eq!(changes.len(), 2);
        assert!(changes[1].deletions.is_empty());
    }

    #[tokio::test]
    async fn test_apply_update_deletes_current_remote_state() {
        let (api, reconciler) = setup();
        let state = reconciler
            .apply(None, &record("test.example.com.", "A", 300, &["10.0.0.1"]))
            .await
            .unwrap();
        api.remove_record_set(PROJECT, ZONE, "test.example.com.", "A");
        api.insert_record_set(
            PROJECT,
            ZONE,
            wire("test.example.com.", "A", 60, &["10.0.0.9"]),
        );
        let desired = record("test.example.com.", "A", 600, &["10.0.0.2"]);

        let updated = reconciler.apply(Some(&state), &desired).await.unwrap();

        assert_eq!(updated, desired);
        let changes = api.submitted_changes();
        assert_eq!(
            changes[1].deletions,
            vec![wire("test.example.com.", "A", 60, &["10.0.0.9"])]
        );
        assert_eq!(
            api.record_sets(PROJECT, ZONE),
            vec![wire("test.example.com.", "A", 600, &["10.0.0.2"])]
        );
    }

    #[tokio::test]
    async fn test_apply_noop_returns_remote_state() {
        let (api, reconciler) = setup();
        let desired = record("test.example.com.", "TXT", 300, &["\"hello\""]);
        let state = reconciler.apply(None, &desired).await.unwrap();
        api.remove_record_set(PROJECT, ZONE, "test.example.com.", "TXT");
        api.insert_record_set(
            PROJECT,
            ZONE,
            wire("test.example.com.", "TXT", 300, &["hello"]),
        );

        let again = reconciler.apply(Some(&state), &desired).await.unwrap();

        assert_eq!(again.rrdatas(), ["hello".to_string()]);
        assert_eq!(api.submitted_changes().len(), 1);
    }
}
