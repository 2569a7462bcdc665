// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-memory Cloud DNS and Compute fakes for unit tests.
//!
//! Changes are applied atomically on submission. `get_change` replays a scripted
//! status sequence and reports `done` once the script is exhausted.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{
    Change, ChangeStatus, ComputeApi, DnsApi, ManagedZone, Network, RecordSetFilter,
    ResourceRecordSet,
};
use crate::dns_errors::ApiError;

#[derive(Debug, Default)]
struct Zone {
    id: u64,
    dns_name: String,
    rrsets: Vec<ResourceRecordSet>,
}

#[derive(Debug, Default)]
struct State {
    zones: HashMap<(String, String), Zone>,
    changes: Vec<Change>,
    status_script: VecDeque<ChangeStatus>,
    fail_next_create: Option<ApiError>,
    hidden_lists: usize,
    list_calls: usize,
    get_change_calls: usize,
    networks: HashMap<(String, String), Network>,
}

/// In-memory [`DnsApi`] and [`ComputeApi`].
#[derive(Debug, Default)]
pub struct InMemoryDnsApi {
    state: Mutex<State>,
}

fn http(status: u16, url: String, message: impl Into<String>) -> ApiError {
    ApiError::Http {
        status,
        url,
        message: message.into(),
    }
}

impl InMemoryDnsApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Add an empty managed zone.
    pub fn with_zone(self, project: &str, zone: &str, dns_name: &str) -> Self {
        {
            let mut state = self.lock();
            let id = 1000 + state.zones.len() as u64;
            state.zones.insert(
                (project.to_string(), zone.to_string()),
                Zone {
                    id,
                    dns_name: dns_name.to_string(),
                    rrsets: Vec::new(),
                },
            );
        }
        self
    }

    /// Add a compute network.
    pub fn with_network(self, project: &str, network: Network) -> Self {
        self.lock()
            .networks
            .insert((project.to_string(), network.name.clone()), network);
        self
    }

    /// Seed a record set directly, bypassing changes.
    pub fn insert_record_set(&self, project: &str, zone: &str, rrset: ResourceRecordSet) {
        let mut state = self.lock();
        let zone = state
            .zones
            .get_mut(&(project.to_string(), zone.to_string()))
            .unwrap();
        zone.rrsets.push(rrset);
    }

    /// Remove a record set directly, bypassing changes.
    pub fn remove_record_set(&self, project: &str, zone: &str, name: &str, record_type: &str) {
        let mut state = self.lock();
        let zone = state
            .zones
            .get_mut(&(project.to_string(), zone.to_string()))
            .unwrap();
        zone.rrsets
            .retain(|r| !(r.name == name && r.record_type == record_type));
    }

    /// Make the next `count` list calls return nothing, as a lagging index would.
    pub fn hide_next_lists(&self, count: usize) {
        self.lock().hidden_lists = count;
    }

    /// Current record sets of a zone.
    pub fn record_sets(&self, project: &str, zone: &str) -> Vec<ResourceRecordSet> {
        self.lock()
            .zones
            .get(&(project.to_string(), zone.to_string()))
            .map(|z| z.rrsets.clone())
            .unwrap_or_default()
    }

    /// Statuses returned by subsequent `get_change` calls.
    pub fn script_change_statuses(&self, statuses: impl IntoIterator<Item = ChangeStatus>) {
        self.lock().status_script = statuses.into_iter().collect();
    }

    /// Make the next `create_change` fail without applying anything.
    pub fn fail_next_create(&self, error: ApiError) {
        self.lock().fail_next_create = Some(error);
    }

    /// Every change submitted so far, in order.
    pub fn submitted_changes(&self) -> Vec<Change> {
        self.lock().changes.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.lock().list_calls
    }

    pub fn get_change_calls(&self) -> usize {
        self.lock().get_change_calls
    }
}

#[async_trait]
impl DnsApi for InMemoryDnsApi {
    async fn list_record_sets(
        &self,
        project: &str,
        managed_zone: &str,
        filter: &RecordSetFilter,
    ) -> Result<Vec<ResourceRecordSet>, ApiError> {
        let mut state = self.lock();
        state.list_calls += 1;
        if state.hidden_lists > 0 {
            state.hidden_lists -= 1;
            return Ok(Vec::new());
        }
        let zone = state
            .zones
            .get(&(project.to_string(), managed_zone.to_string()))
            .ok_or_else(|| http(404, format!("{project}/{managed_zone}"), "zone not found"))?;
        Ok(zone
            .rrsets
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn create_change(
        &self,
        project: &str,
        managed_zone: &str,
        change: &Change,
    ) -> Result<Change, ApiError> {
        let mut state = self.lock();
        if let Some(error) = state.fail_next_create.take() {
            return Err(error);
        }

        let url = format!("{project}/{managed_zone}/changes");
        let zone = state
            .zones
            .get(&(project.to_string(), managed_zone.to_string()))
            .ok_or_else(|| http(404, url.clone(), "zone not found"))?;

        let mut rrsets = zone.rrsets.clone();
        for deletion in &change.deletions {
            let position = rrsets
                .iter()
                .position(|r| r.name == deletion.name && r.record_type == deletion.record_type)
                .ok_or_else(|| {
                    http(
                        404,
                        url.clone(),
                        format!(
                            "The resource record set '{}/{}' does not exist",
                            deletion.name, deletion.record_type
                        ),
                    )
                })?;
            rrsets.remove(position);
        }
        for addition in &change.additions {
            if rrsets
                .iter()
                .any(|r| r.name == addition.name && r.record_type == addition.record_type)
            {
                return Err(http(
                    409,
                    url,
                    format!(
                        "The resource record set '{}/{}' already exists",
                        addition.name, addition.record_type
                    ),
                ));
            }
            rrsets.push(addition.clone());
        }

        let id = state.changes.len().to_string();
        if let Some(zone) = state
            .zones
            .get_mut(&(project.to_string(), managed_zone.to_string()))
        {
            zone.rrsets = rrsets;
        }

        let created = Change {
            id: Some(id),
            status: Some(ChangeStatus::Pending),
            additions: change.additions.clone(),
            deletions: change.deletions.clone(),
            start_time: Some("2025-01-01T00:00:00Z".to_string()),
        };
        state.changes.push(created.clone());
        Ok(created)
    }

    async fn get_change(
        &self,
        project: &str,
        managed_zone: &str,
        change_id: &str,
    ) -> Result<Change, ApiError> {
        let mut state = self.lock();
        state.get_change_calls += 1;
        let status = state.status_script.pop_front().unwrap_or(ChangeStatus::Done);
        let mut change = state
            .changes
            .iter()
            .find(|c| c.id.as_deref() == Some(change_id))
            .cloned()
            .ok_or_else(|| {
                http(
                    404,
                    format!("{project}/{managed_zone}/changes/{change_id}"),
                    "change not found",
                )
            })?;
        change.status = Some(status);
        Ok(change)
    }

    async fn get_managed_zone(
        &self,
        project: &str,
        managed_zone: &str,
    ) -> Result<ManagedZone, ApiError> {
        let state = self.lock();
        let zone = state
            .zones
            .get(&(project.to_string(), managed_zone.to_string()))
            .ok_or_else(|| http(404, format!("{project}/{managed_zone}"), "zone not found"))?;
        Ok(ManagedZone {
            id: zone.id.to_string(),
            name: managed_zone.to_string(),
            dns_name: zone.dns_name.clone(),
            description: "Managed by Terraform".to_string(),
            name_servers: vec![
                "ns-cloud-a1.googledomains.com.".to_string(),
                "ns-cloud-a2.googledomains.com.".to_string(),
            ],
            visibility: "public".to_string(),
        })
    }
}

#[async_trait]
impl ComputeApi for InMemoryDnsApi {
    async fn get_network(&self, project: &str, network: &str) -> Result<Network, ApiError> {
        self.lock()
            .networks
            .get(&(project.to_string(), network.to_string()))
            .cloned()
            .ok_or_else(|| {
                http(
                    404,
                    format!("projects/{project}/global/networks/{network}"),
                    "network not found",
                )
            })
    }
}
