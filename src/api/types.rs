// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Cloud DNS v1 and Compute v1 REST shapes.
//!
//! Field names follow the JSON API (camelCase). Enum-like values stay strings here;
//! they are checked when flattened into [`crate::model`].

use serde::{Deserialize, Serialize};

/// A resource record set as sent to and returned by the API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecordSet {
    /// Fully-qualified name
    pub name: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: String,
    /// Time to live; omitted when zero
    #[serde(default, skip_serializing_if = "is_zero")]
    pub ttl: i64,
    /// Static record data
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rrdatas: Vec<String>,
    /// Routing policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_policy: Option<RrSetRoutingPolicy>,
    /// Resource kind marker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(v: &i64) -> bool {
    *v == 0
}

/// Routing policy: the service sets exactly one member.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RrSetRoutingPolicy {
    /// Weighted round robin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrr: Option<WrrPolicy>,
    /// Geolocation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoPolicy>,
    /// Primary with backup geolocation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_backup: Option<PrimaryBackupPolicy>,
}

/// Weighted round robin policy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrrPolicy {
    /// Answers
    #[serde(default)]
    pub items: Vec<WrrPolicyItem>,
}

/// Weighted round robin answer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrrPolicyItem {
    /// Traffic ratio
    #[serde(default)]
    pub weight: f64,
    /// Record data
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rrdatas: Vec<String>,
    /// Health-checked targets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_checked_targets: Option<HealthCheckTargets>,
}

/// Geolocation policy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPolicy {
    /// Answers by location
    #[serde(default)]
    pub items: Vec<GeoPolicyItem>,
    /// Fencing
    #[serde(default)]
    pub enable_fencing: bool,
}

/// Geolocation answer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPolicyItem {
    /// Cloud location
    #[serde(default)]
    pub location: String,
    /// Record data
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rrdatas: Vec<String>,
    /// Health-checked targets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_checked_targets: Option<HealthCheckTargets>,
}

/// Primary-backup policy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryBackupPolicy {
    /// Global primary targets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_targets: Option<HealthCheckTargets>,
    /// Regional failover
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_geo_targets: Option<GeoPolicy>,
    /// Share of traffic sent to the backups while the primaries are healthy
    #[serde(default)]
    pub trickle_traffic: f64,
}

/// Health-checked targets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckTargets {
    /// Internal load balancers
    #[serde(default)]
    pub internal_load_balancers: Vec<LoadBalancerTarget>,
}

/// Internal load balancer target.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerTarget {
    /// `regionalL4ilb`
    pub load_balancer_type: String,
    /// Frontend address
    #[serde(default)]
    pub ip_address: String,
    /// Port
    #[serde(default)]
    pub port: String,
    /// `tcp` or `udp`
    pub ip_protocol: String,
    /// Fully-qualified network URL
    #[serde(default)]
    pub network_url: String,
    /// Project of the load balancer
    #[serde(default)]
    pub project: String,
    /// Region of the load balancer
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region: String,
}

/// An atomic change to the record sets of a zone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    /// Server-assigned id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Processing status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ChangeStatus>,
    /// Record sets to add
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additions: Vec<ResourceRecordSet>,
    /// Record sets to remove
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deletions: Vec<ResourceRecordSet>,
    /// RFC 3339 submission time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
}

/// Processing status of a change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    /// Still being applied
    Pending,
    /// Applied
    Done,
    /// Anything the service may add later
    #[serde(other)]
    Unknown,
}

impl ChangeStatus {
    /// Lowercase wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => crate::constants::CHANGE_STATUS_PENDING,
            Self::Done => crate::constants::CHANGE_STATUS_DONE,
            Self::Unknown => "unknown",
        }
    }
}

/// A managed zone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedZone {
    /// Numeric id, rendered by the API as a string
    #[serde(default)]
    pub id: String,
    /// Zone name
    #[serde(default)]
    pub name: String,
    /// DNS name with trailing dot
    #[serde(default)]
    pub dns_name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Authoritative name servers
    #[serde(default)]
    pub name_servers: Vec<String>,
    /// `public` or `private`
    #[serde(default)]
    pub visibility: String,
}

/// One page of `resourceRecordSets.list`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecordSetsListResponse {
    /// Record sets on this page
    #[serde(default)]
    pub rrsets: Vec<ResourceRecordSet>,
    /// Token of the next page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// A compute network.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    /// Network name
    #[serde(default)]
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Gateway address of legacy networks
    #[serde(default, rename = "gatewayIPv4")]
    pub gateway_ipv4: String,
    /// Self link
    #[serde(default)]
    pub self_link: String,
    /// Subnetwork self links
    #[serde(default)]
    pub subnetworks: Vec<String>,
}

/// Filter for record-set listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordSetFilter {
    /// Only record sets with this name
    pub name: Option<String>,
    /// Only record sets with this type; requires `name`
    pub record_type: Option<String>,
}

impl RecordSetFilter {
    /// Filter for a single `(name, type)` key.
    pub fn key(name: impl Into<String>, record_type: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            record_type: Some(record_type.into()),
        }
    }

    /// Returns true if `rrset` passes the filter.
    #[must_use]
    pub fn matches(&self, rrset: &ResourceRecordSet) -> bool {
        self.name.as_ref().is_none_or(|n| *n == rrset.name)
            && self
                .record_type
                .as_ref()
                .is_none_or(|t| *t == rrset.record_type)
    }
}
