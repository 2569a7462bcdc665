// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Record-set reconciler.
//!
//! The reconciler keeps no state between calls. Every operation reads the remote
//! zone, submits at most one atomic [`Change`], and blocks until the change is
//! `done` before reading the result back.
//!
//! # Operations
//!
//! - [`RecordSetReconciler::create`] replaces any record set already at the key
//! - [`RecordSetReconciler::read`] returns `None` when the record set is gone
//! - [`RecordSetReconciler::update`] swaps the prior record set for the desired one
//! - [`RecordSetReconciler::delete`] never deletes the apex NS record set
//! - [`RecordSetReconciler::import`] reads a record set by import identifier
//! - [`RecordSetReconciler::apply`] reads the current record set, then plans and runs
//!   whichever of the above is needed

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::{Change, DnsApi, RecordSetFilter};
use crate::constants::RECORD_TYPE_NS;
use crate::dns_errors::{ApiError, DnsError, ValidationError};
use crate::import_id::parse_record_set_import_id;
use crate::metrics::{
    record_change_submitted, record_reconciliation_error, record_reconciliation_success,
    record_record_set_action,
};
use crate::model::{RecordSet, RecordSetKey, RoutingPolicy};
use crate::reconcilers::change_waiter::{wait_for_change, WaitConfig, WaitOutcome};
use crate::reconcilers::retry::read_back_backoff;
use crate::routing_policy::{expand_record_set, flatten_record_set};
use crate::template::NetworkUrlResolver;

/// What [`RecordSetReconciler::apply`] will do to converge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Plan {
    /// No prior state
    Create,
    /// Same project, zone and name; different type, TTL or data
    Update,
    /// Project, zone or name changed: delete then create
    Replace,
    /// Already converged
    NoOp,
}

/// Result of [`RecordSetReconciler::delete`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// The record set is gone
    Deleted,
    /// The record set is the zone's apex NS set, which is left in place
    SkippedApexNs,
}

/// Converges Cloud DNS record sets toward a declared state.
#[derive(Clone)]
pub struct RecordSetReconciler {
    api: Arc<dyn DnsApi>,
    compute_base_path: String,
    wait: WaitConfig,
}

impl RecordSetReconciler {
    /// Create a reconciler over `api`.
    ///
    /// `compute_base_path` is used to expand health-checked target network names.
    pub fn new(api: Arc<dyn DnsApi>, compute_base_path: impl Into<String>) -> Self {
        Self {
            api,
            compute_base_path: compute_base_path.into(),
            wait: WaitConfig::default(),
        }
    }

    /// Override the change wait budget.
    #[must_use]
    pub fn with_wait_config(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    /// The API this reconciler talks to.
    #[must_use]
    pub fn api(&self) -> &dyn DnsApi {
        self.api.as_ref()
    }

    fn resolver(&self, project: &str) -> NetworkUrlResolver {
        NetworkUrlResolver::new(&self.compute_base_path, project)
    }

    /// Decide how to get from `prior` to `desired`.
    #[must_use]
    pub fn plan(prior: Option<&RecordSet>, desired: &RecordSet) -> Plan {
        match prior {
            None => Plan::Create,
            Some(prior) if prior.key.requires_replace(&desired.key) => Plan::Replace,
            Some(prior) if prior.is_equivalent(desired) => Plan::NoOp,
            Some(_) => Plan::Update,
        }
    }

    /// Converge to `desired` given the last recorded state.
    ///
    /// `prior` only names the record set to look at: the plan is made against what
    /// the API currently reports at `prior.key`. A record set that disappeared is
    /// created again, and an update deletes the record set as it is now.
    ///
    /// Returns the state read back after the change, or the current state when
    /// nothing needs to be done.
    ///
    /// # Errors
    ///
    /// Returns the error of the read or of whichever operation the plan runs.
    pub async fn apply(
        &self,
        prior: Option<&RecordSet>,
        desired: &RecordSet,
    ) -> Result<RecordSet, DnsError> {
        let current = match prior {
            Some(prior) => {
                let current = self.read(&prior.key).await?;
                match &current {
                    None => info!(
                        record_set = %prior.key,
                        "Recorded record set no longer exists; it will be created"
                    ),
                    Some(current) if current != prior => debug!(
                        record_set = %prior.key,
                        "Record set drifted from recorded state"
                    ),
                    Some(_) => {}
                }
                current
            }
            None => None,
        };

        let plan = Self::plan(current.as_ref(), desired);
        debug!(
            record_set = %desired.key,
            plan = ?plan,
            routing_policy = desired.routing_policy().map_or("none", RoutingPolicy::kind),
            "Planned record set reconciliation"
        );

        match (plan, current) {
            (Plan::NoOp, Some(current)) => {
                record_record_set_action(&desired.key.record_type, "noop");
                Ok(current)
            }
            (Plan::Update, Some(current)) => self.update(&current, desired).await,
            (Plan::Replace, Some(current)) => {
                self.delete(&current).await?;
                self.create(desired).await
            }
            _ => self.create(desired).await,
        }
    }

    /// Create `desired`, replacing any record set already stored at its key.
    ///
    /// # Errors
    ///
    /// Returns [`DnsError::NotFound`] if the record set is still not listed once the
    /// read-back budget is spent, or any transport, mapping or wait error.
    pub async fn create(&self, desired: &RecordSet) -> Result<RecordSet, DnsError> {
        let start = Instant::now();
        let result = self.create_inner(desired).await;
        record_outcome("create", start, &result);
        result
    }

    async fn create_inner(&self, desired: &RecordSet) -> Result<RecordSet, DnsError> {
        let key = &desired.key;
        let addition = expand_record_set(desired, &self.resolver(&key.project))?;

        let stale: Vec<_> = self
            .api
            .list_record_sets(
                &key.project,
                &key.managed_zone,
                &RecordSetFilter::key(&key.name, &key.record_type),
            )
            .await?
            .into_iter()
            .filter(|r| r.name == key.name && r.record_type == key.record_type)
            .collect();

        if !stale.is_empty() {
            info!(
                project = %key.project,
                managed_zone = %key.managed_zone,
                name = %key.name,
                record_type = %key.record_type,
                count = stale.len(),
                "Replacing existing record sets at key"
            );
        }

        let change = Change {
            additions: vec![addition],
            deletions: stale,
            ..Change::default()
        };
        self.submit_and_wait("create", key, &change).await?;
        record_record_set_action(&key.record_type, "create");

        self.read_back(key).await
    }

    /// Read the record set stored at `key`.
    ///
    /// Returns `None` if no record set exists. If the service returns more than one,
    /// the first is used and a warning is logged.
    ///
    /// # Errors
    ///
    /// Returns transport errors and mapping errors for unreadable routing policies.
    pub async fn read(&self, key: &RecordSetKey) -> Result<Option<RecordSet>, DnsError> {
        let rrsets = self
            .api
            .list_record_sets(
                &key.project,
                &key.managed_zone,
                &RecordSetFilter::key(&key.name, &key.record_type),
            )
            .await?;

        let Some(first) = rrsets.first() else {
            debug!(record_set = %key, "Record set not found");
            return Ok(None);
        };

        if rrsets.len() > 1 {
            let ambiguous = DnsError::Ambiguous {
                name: key.name.clone(),
                record_type: key.record_type.clone(),
                count: rrsets.len(),
            };
            warn!(
                project = %key.project,
                managed_zone = %key.managed_zone,
                reason = ambiguous.status_reason(),
                "{ambiguous}; using the first"
            );
        }

        flatten_record_set(&key.project, &key.managed_zone, first).map(Some)
    }

    /// Read `key` after a completed change, retrying while it is not yet listed.
    async fn read_back(&self, key: &RecordSetKey) -> Result<RecordSet, DnsError> {
        let mut backoff = read_back_backoff();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            if let Some(record_set) = self.read(key).await? {
                return Ok(record_set);
            }

            let Some(delay) = backoff.next_backoff() else {
                return Err(DnsError::NotFound(key.id()));
            };
            debug!(
                record_set = %key,
                attempt = attempt,
                retry_after = ?delay,
                "Record set not listed yet after change"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Replace `prior` with `desired` in one change.
    ///
    /// The deletion carries `prior` exactly as given, so the change fails if the
    /// remote record set differs from it. [`Self::apply`] passes the state it just
    /// read.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidConfig`] if the keys differ in a way that
    /// requires replacement, [`DnsError::NotFound`] if the result cannot be read
    /// back, or any transport, mapping or wait error.
    pub async fn update(&self, prior: &RecordSet, desired: &RecordSet) -> Result<RecordSet, DnsError> {
        let start = Instant::now();
        let result = self.update_inner(prior, desired).await;
        record_outcome("update", start, &result);
        result
    }

    async fn update_inner(
        &self,
        prior: &RecordSet,
        desired: &RecordSet,
    ) -> Result<RecordSet, DnsError> {
        if prior.key.requires_replace(&desired.key) {
            return Err(ValidationError::InvalidConfig {
                field: "name".to_string(),
                reason: format!(
                    "{} cannot be updated in place to {}",
                    prior.key, desired.key
                ),
            }
            .into());
        }

        let key = &desired.key;
        let resolver = self.resolver(&key.project);
        let change = Change {
            additions: vec![expand_record_set(desired, &resolver)?],
            deletions: vec![expand_record_set(prior, &self.resolver(&prior.key.project))?],
            ..Change::default()
        };
        self.submit_and_wait("update", key, &change).await?;
        record_record_set_action(&key.record_type, "update");

        self.read_back(key).await
    }

    /// Delete `state`.
    ///
    /// The apex NS record set of a zone cannot be removed; deleting it is a no-op
    /// reported as [`DeleteOutcome::SkippedApexNs`]. A record set that is already
    /// gone is reported as deleted.
    ///
    /// # Errors
    ///
    /// Returns transport, mapping and wait errors.
    pub async fn delete(&self, state: &RecordSet) -> Result<DeleteOutcome, DnsError> {
        let start = Instant::now();
        let result = self.delete_inner(state).await;
        record_outcome("delete", start, &result);
        result
    }

    async fn delete_inner(&self, state: &RecordSet) -> Result<DeleteOutcome, DnsError> {
        let key = &state.key;

        if key.record_type == RECORD_TYPE_NS {
            let zone = self
                .api
                .get_managed_zone(&key.project, &key.managed_zone)
                .await?;
            if zone.dns_name == key.name {
                warn!(
                    project = %key.project,
                    managed_zone = %key.managed_zone,
                    name = %key.name,
                    "Skipping deletion of apex NS record set; it is removed with the zone"
                );
                record_record_set_action(&key.record_type, "skip");
                return Ok(DeleteOutcome::SkippedApexNs);
            }
        }

        let change = Change {
            deletions: vec![expand_record_set(state, &self.resolver(&key.project))?],
            ..Change::default()
        };
        let change_id = match self.submit("delete", key, &change).await {
            Ok(id) => id,
            Err(DnsError::Transport(e)) if e.is_not_found() => {
                info!(record_set = %key, "Record set already deleted");
                record_record_set_action(&key.record_type, "delete");
                return Ok(DeleteOutcome::Deleted);
            }
            Err(e) => return Err(e),
        };
        wait_for_change(
            self.api.as_ref(),
            &key.project,
            &key.managed_zone,
            &change_id,
            &self.wait,
        )
        .await?;
        record_record_set_action(&key.record_type, "delete");
        Ok(DeleteOutcome::Deleted)
    }

    /// Read the record set named by an import identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DnsError::ImportId`] for an identifier in no known format and
    /// [`DnsError::NotFound`] if the record set does not exist.
    pub async fn import(
        &self,
        id: &str,
        default_project: Option<&str>,
    ) -> Result<RecordSet, DnsError> {
        let start = Instant::now();
        let result = self.import_inner(id, default_project).await;
        record_outcome("import", start, &result);
        result
    }

    async fn import_inner(
        &self,
        id: &str,
        default_project: Option<&str>,
    ) -> Result<RecordSet, DnsError> {
        let key = parse_record_set_import_id(id, default_project)?;
        info!(import_id = %id, record_set = %key, "Importing record set");
        self.read(&key)
            .await?
            .ok_or_else(|| DnsError::NotFound(key.id()))
    }

    /// Submit a change and return its id.
    async fn submit(
        &self,
        operation: &str,
        key: &RecordSetKey,
        change: &Change,
    ) -> Result<String, DnsError> {
        let created = self
            .api
            .create_change(&key.project, &key.managed_zone, change)
            .await?;
        record_change_submitted(operation);

        let change_id = created.id.ok_or_else(|| ApiError::Decode {
            url: key.id(),
            reason: "change response has no id".to_string(),
        })?;
        info!(
            project = %key.project,
            managed_zone = %key.managed_zone,
            name = %key.name,
            record_type = %key.record_type,
            change_id = %change_id,
            operation = operation,
            "Submitted record set change"
        );
        Ok(change_id)
    }

    async fn submit_and_wait(
        &self,
        operation: &str,
        key: &RecordSetKey,
        change: &Change,
    ) -> Result<WaitOutcome, DnsError> {
        let change_id = self.submit(operation, key, change).await?;
        wait_for_change(
            self.api.as_ref(),
            &key.project,
            &key.managed_zone,
            &change_id,
            &self.wait,
        )
        .await
    }
}

fn record_outcome<T>(operation: &str, start: Instant, result: &Result<T, DnsError>) {
    let duration = start.elapsed();
    match result {
        Ok(_) => record_reconciliation_success(operation, duration),
        Err(e) => {
            warn!(
                operation = operation,
                reason = e.status_reason(),
                transient = e.is_transient(),
                error = %e,
                "Record set operation failed"
            );
            record_reconciliation_error(operation, e.status_reason(), duration);
        }
    }
}

#[cfg(test)]
#[path = "record_set_tests.rs"]
mod record_set_tests;
