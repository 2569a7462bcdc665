// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Cleanup of record sets left behind by test runs.
//!
//! Only record sets whose name starts with the test prefix are deleted. The SOA
//! record set and the apex NS record set are never touched. A failed deletion is
//! logged and counted, and sweeping continues with the next record set.

use serde::Serialize;
use tracing::{debug, error, info};

use crate::api::RecordSetFilter;
use crate::constants::{RECORD_TYPE_NS, RECORD_TYPE_SOA};
use crate::dns_errors::DnsError;
use crate::reconcilers::RecordSetReconciler;
use crate::routing_policy::flatten_record_set;

/// Counts from one sweep.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Record sets deleted
    pub deleted: usize,
    /// Record sets whose deletion failed
    pub failed: usize,
    /// Record sets left alone because their name lacks the prefix
    pub skipped_non_prefixed: usize,
    /// SOA and apex NS record sets left alone
    pub skipped_protected: usize,
}

/// Delete every record set in `project`/`managed_zone` whose name starts with `prefix`.
///
/// # Errors
///
/// Returns an error only if the zone cannot be read or listed. Per-record-set
/// failures are reported in [`SweepReport::failed`].
pub async fn sweep_record_sets(
    reconciler: &RecordSetReconciler,
    project: &str,
    managed_zone: &str,
    prefix: &str,
) -> Result<SweepReport, DnsError> {
    let api = reconciler.api();
    let zone = api.get_managed_zone(project, managed_zone).await?;
    let rrsets = api
        .list_record_sets(project, managed_zone, &RecordSetFilter::default())
        .await?;

    info!(
        project = %project,
        managed_zone = %managed_zone,
        prefix = %prefix,
        count = rrsets.len(),
        "Sweeping record sets"
    );

    let mut report = SweepReport::default();
    for rrset in &rrsets {
        let protected = rrset.record_type == RECORD_TYPE_SOA
            || (rrset.record_type == RECORD_TYPE_NS && rrset.name == zone.dns_name);
        if protected {
            report.skipped_protected += 1;
            continue;
        }
        if !rrset.name.starts_with(prefix) {
            debug!(name = %rrset.name, record_type = %rrset.record_type, "Keeping record set without test prefix");
            report.skipped_non_prefixed += 1;
            continue;
        }

        let result = match flatten_record_set(project, managed_zone, rrset) {
            Ok(state) => reconciler.delete(&state).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(_) => report.deleted += 1,
            Err(e) => {
                error!(
                    name = %rrset.name,
                    record_type = %rrset.record_type,
                    error = %e,
                    "Error deleting record set during sweep"
                );
                report.failed += 1;
            }
        }
    }

    info!(
        managed_zone = %managed_zone,
        deleted = report.deleted,
        failed = report.failed,
        skipped = report.skipped_non_prefixed,
        "Sweep finished"
    );
    Ok(report)
}
