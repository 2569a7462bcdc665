// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Declarative record-set model.
//!
//! There are two layers:
//!
//! - **Configuration** ([`RecordSetConfig`], [`RoutingPolicyConfig`]) mirrors the YAML a
//!   user writes. Record data and routing strategies are optional blocks, so invalid
//!   combinations can be expressed.
//! - **Resolved** ([`RecordSet`], [`RecordData`], [`RoutingPolicy`]) is produced by
//!   [`RecordSetConfig::resolve`]. Exactly one kind of record data and exactly one
//!   routing strategy are enforced by the types.
//!
//! Item types shared by both layers ([`WrrItem`], [`GeoItem`], [`HealthCheckedTargets`],
//! [`LoadBalancerTarget`]) carry serde attributes for the configuration shape.
//!
//! # Example
//!
//! ```rust
//! use gcdns::model::{RecordData, RecordSetConfig};
//!
//! let config: RecordSetConfig = serde_yaml::from_str(r#"
//! managed_zone: prod-zone
//! name: test.example.com.
//! type: A
//! ttl: 300
//! rrdatas: ["192.168.1.1"]
//! "#).unwrap();
//!
//! let record_set = config.resolve(Some("my-project")).unwrap();
//! assert_eq!(record_set.key.project, "my-project");
//! assert_eq!(record_set.data, RecordData::Rrdatas(vec!["192.168.1.1".into()]));
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{IP_PROTOCOL_TCP, IP_PROTOCOL_UDP, LOAD_BALANCER_TYPE_REGIONAL_L4_ILB};
use crate::dns_errors::{DnsError, RoutingPolicyError, ValidationError};
use crate::validation::{validate_one_of, validate_trailing_dot, validate_ttl};

// ============================================================================
// Identity
// ============================================================================

/// Identity of a record set: `(project, managed_zone, name, type)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordSetKey {
    /// Project owning the managed zone
    pub project: String,
    /// Managed zone name (not its DNS name)
    pub managed_zone: String,
    /// Fully-qualified record name with trailing dot
    pub name: String,
    /// Record type (`A`, `AAAA`, `NS`, ...)
    #[serde(rename = "type")]
    pub record_type: String,
}

impl RecordSetKey {
    /// Canonical identifier: `projects/{project}/managedZones/{zone}/rrsets/{name}/{type}`.
    #[must_use]
    pub fn id(&self) -> String {
        format!(
            "projects/{}/managedZones/{}/rrsets/{}/{}",
            self.project, self.managed_zone, self.name, self.record_type
        )
    }

    /// Returns true if any attribute that forces replacement differs from `other`.
    ///
    /// Changing the project, the zone or the name moves the record set and cannot be
    /// expressed as a single in-place change. The type can.
    #[must_use]
    pub fn requires_replace(&self, other: &Self) -> bool {
        self.project != other.project
            || self.managed_zone != other.managed_zone
            || self.name != other.name
    }
}

impl fmt::Display for RecordSetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

// ============================================================================
// Enumerations
// ============================================================================

/// Load balancer kind of a health-checked target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadBalancerType {
    /// Regional internal TCP/UDP load balancer
    #[serde(rename = "regionalL4ilb")]
    RegionalL4Ilb,
}

impl LoadBalancerType {
    /// Wire representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RegionalL4Ilb => LOAD_BALANCER_TYPE_REGIONAL_L4_ILB,
        }
    }
}

impl FromStr for LoadBalancerType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_one_of(
            "load_balancer_type",
            s,
            &[LOAD_BALANCER_TYPE_REGIONAL_L4_ILB],
        )?;
        Ok(Self::RegionalL4Ilb)
    }
}

/// IP protocol of a health-checked target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpProtocol {
    /// TCP
    Tcp,
    /// UDP
    Udp,
}

impl IpProtocol {
    /// Wire representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => IP_PROTOCOL_TCP,
            Self::Udp => IP_PROTOCOL_UDP,
        }
    }
}

impl FromStr for IpProtocol {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_one_of("ip_protocol", s, &[IP_PROTOCOL_TCP, IP_PROTOCOL_UDP])?;
        Ok(if s == IP_PROTOCOL_TCP {
            Self::Tcp
        } else {
            Self::Udp
        })
    }
}

// ============================================================================
// Routing Policy Items
// ============================================================================

/// An internal load balancer whose health gates an answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerTarget {
    /// Kind of load balancer
    pub load_balancer_type: LoadBalancerType,
    /// Frontend IP address
    pub ip_address: String,
    /// Configured port
    pub port: String,
    /// Configured protocol
    pub ip_protocol: IpProtocol,
    /// Network the load balancer belongs to, a name, a relative path or a full URL
    pub network_url: String,
    /// Project the load balancer belongs to
    pub project: String,
    /// Region, for regional load balancers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Targets to health check.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckedTargets {
    /// Internal load balancers, in order
    #[serde(default)]
    pub internal_load_balancers: Vec<LoadBalancerTarget>,
}

/// One weighted-round-robin answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WrrItem {
    /// Ratio of traffic routed to this answer
    pub weight: f64,
    /// Record data served for this answer
    #[serde(default)]
    pub rrdatas: Vec<String>,
    /// Health-checked targets served for this answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_checked_targets: Option<HealthCheckedTargets>,
}

/// One geolocation answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoItem {
    /// Cloud location name, e.g. `us-east1`
    pub location: String,
    /// Record data served for this location
    #[serde(default)]
    pub rrdatas: Vec<String>,
    /// Health-checked targets served for this location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_checked_targets: Option<HealthCheckedTargets>,
}

// ============================================================================
// Resolved Model
// ============================================================================

/// Geolocation policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeoPolicy {
    /// Answers by location
    pub items: Vec<GeoItem>,
    /// Only answer from the matching location, never the nearest one
    pub enable_fencing: bool,
}

/// Primary targets with a geolocation failover.
#[derive(Clone, Debug, PartialEq)]
pub struct PrimaryBackupPolicy {
    /// Global primary targets
    pub primary_targets: HealthCheckedTargets,
    /// Regional failover answers
    pub backup_geo: Vec<GeoItem>,
    /// Fencing for the backup geolocation answers
    pub enable_fencing_for_backups: bool,
    /// Share of traffic sent to the backups while the primaries are healthy
    pub trickle_ratio: f64,
}

/// Routing policy: exactly one strategy.
#[derive(Clone, Debug, PartialEq)]
pub enum RoutingPolicy {
    /// Weighted round robin
    WeightedRoundRobin(Vec<WrrItem>),
    /// Geolocation
    Geo(GeoPolicy),
    /// Primary with backup geolocation
    PrimaryBackup(PrimaryBackupPolicy),
}

impl RoutingPolicy {
    /// Short name of the strategy, used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::WeightedRoundRobin(_) => "wrr",
            Self::Geo(_) => "geo",
            Self::PrimaryBackup(_) => "primary_backup",
        }
    }
}

/// Record data: plain rrdatas or a routing policy, never both.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordData {
    /// Static record data
    Rrdatas(Vec<String>),
    /// Answers chosen by a routing policy
    RoutingPolicy(RoutingPolicy),
}

/// A fully resolved record set.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordSet {
    /// Identity
    pub key: RecordSetKey,
    /// Time to live in seconds
    pub ttl: Option<i64>,
    /// Record data
    pub data: RecordData,
}

impl RecordSet {
    /// Static record data, empty for routing-policy record sets.
    #[must_use]
    pub fn rrdatas(&self) -> &[String] {
        match &self.data {
            RecordData::Rrdatas(rrdatas) => rrdatas,
            RecordData::RoutingPolicy(_) => &[],
        }
    }

    /// The routing policy, if any.
    #[must_use]
    pub fn routing_policy(&self) -> Option<&RoutingPolicy> {
        match &self.data {
            RecordData::RoutingPolicy(policy) => Some(policy),
            RecordData::Rrdatas(_) => None,
        }
    }

    /// Returns true if `other` describes the same record set.
    ///
    /// Static rrdatas are compared as sets after type-specific normalization (see
    /// [`rrdatas_equivalent`]); routing policies are compared exactly.
    #[must_use]
    pub fn is_equivalent(&self, other: &Self) -> bool {
        if self.key != other.key || self.ttl != other.ttl {
            return false;
        }
        match (&self.data, &other.data) {
            (RecordData::Rrdatas(a), RecordData::Rrdatas(b)) => {
                rrdatas_equivalent(&self.key.record_type, a, b)
            }
            (RecordData::RoutingPolicy(a), RecordData::RoutingPolicy(b)) => a == b,
            _ => false,
        }
    }
}

/// Normalize one rrdata for comparison.
fn normalize_rrdata(record_type: &str, record: &str) -> String {
    match record_type {
        "AAAA" => record
            .parse::<Ipv6Addr>()
            .map_or_else(|_| record.to_string(), |ip| ip.to_string()),
        "MX" | "DS" => record.to_lowercase(),
        "TXT" => record.trim_matches('"').to_lowercase(),
        _ => record.to_string(),
    }
}

/// Compare two rrdata lists the way the DNS service does.
///
/// Order and duplicates are ignored. `AAAA` values are compared as parsed IPv6
/// addresses, `MX` and `DS` case-insensitively, and `TXT` case-insensitively with
/// surrounding quotes removed.
///
/// ```
/// use gcdns::model::rrdatas_equivalent;
///
/// let a = vec!["2001:db8::1".to_string()];
/// let b = vec!["2001:0db8:0000::0001".to_string()];
/// assert!(rrdatas_equivalent("AAAA", &a, &b));
/// ```
#[must_use]
pub fn rrdatas_equivalent(record_type: &str, old: &[String], new: &[String]) -> bool {
    let normalize = |list: &[String]| -> BTreeSet<String> {
        list.iter()
            .map(|r| normalize_rrdata(record_type, r))
            .collect()
    };
    normalize(old) == normalize(new)
}

// ============================================================================
// Configuration Model
// ============================================================================

/// Primary-backup block of a routing-policy configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrimaryBackupConfig {
    /// Global primary targets
    pub primary: HealthCheckedTargets,
    /// Regional failover answers
    #[serde(default)]
    pub backup_geo: Vec<GeoItem>,
    /// Fencing for the backup geolocation answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_geo_fencing_for_backups: Option<bool>,
    /// Share of traffic sent to the backups while the primaries are healthy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trickle_ratio: Option<f64>,
}

/// Routing-policy configuration block.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingPolicyConfig {
    /// Weighted round robin answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrr: Option<Vec<WrrItem>>,
    /// Geolocation answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<Vec<GeoItem>>,
    /// Fencing for geolocation answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_geo_fencing: Option<bool>,
    /// Primary-backup policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_backup: Option<PrimaryBackupConfig>,
}

impl RoutingPolicyConfig {
    /// Resolve into exactly one routing strategy.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingPolicyError::AmbiguousPolicy`] if no strategy is set and
    /// [`RoutingPolicyError::ConflictingPolicy`] if more than one is.
    pub fn resolve(&self) -> Result<RoutingPolicy, RoutingPolicyError> {
        let mut set = Vec::new();
        if self.wrr.is_some() {
            set.push("wrr".to_string());
        }
        if self.geo.is_some() {
            set.push("geo".to_string());
        }
        if self.primary_backup.is_some() {
            set.push("primary_backup".to_string());
        }
        if set.len() > 1 {
            return Err(RoutingPolicyError::ConflictingPolicy { variants: set });
        }

        if let Some(items) = &self.wrr {
            return Ok(RoutingPolicy::WeightedRoundRobin(items.clone()));
        }
        if let Some(items) = &self.geo {
            return Ok(RoutingPolicy::Geo(GeoPolicy {
                items: items.clone(),
                enable_fencing: self.enable_geo_fencing.unwrap_or(false),
            }));
        }
        if let Some(pb) = &self.primary_backup {
            return Ok(RoutingPolicy::PrimaryBackup(PrimaryBackupPolicy {
                primary_targets: pb.primary.clone(),
                backup_geo: pb.backup_geo.clone(),
                enable_fencing_for_backups: pb.enable_geo_fencing_for_backups.unwrap_or(false),
                trickle_ratio: pb.trickle_ratio.unwrap_or(0.0),
            }));
        }
        Err(RoutingPolicyError::AmbiguousPolicy)
    }
}

impl From<&RoutingPolicy> for RoutingPolicyConfig {
    fn from(policy: &RoutingPolicy) -> Self {
        match policy {
            RoutingPolicy::WeightedRoundRobin(items) => Self {
                wrr: Some(items.clone()),
                ..Self::default()
            },
            RoutingPolicy::Geo(geo) => Self {
                geo: Some(geo.items.clone()),
                enable_geo_fencing: Some(geo.enable_fencing),
                ..Self::default()
            },
            RoutingPolicy::PrimaryBackup(pb) => Self {
                primary_backup: Some(PrimaryBackupConfig {
                    primary: pb.primary_targets.clone(),
                    backup_geo: pb.backup_geo.clone(),
                    enable_geo_fencing_for_backups: Some(pb.enable_fencing_for_backups),
                    trickle_ratio: Some(pb.trickle_ratio),
                }),
                ..Self::default()
            },
        }
    }
}

/// Record-set configuration as written by the user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordSetConfig {
    /// Project; falls back to the provider project
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Managed zone name
    pub managed_zone: String,
    /// Fully-qualified record name with trailing dot
    pub name: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: String,
    /// Time to live in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    /// Static record data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rrdatas: Option<Vec<String>>,
    /// Routing policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_policy: Option<RoutingPolicyConfig>,
}

impl RecordSetConfig {
    /// Validate the configuration and resolve it into a [`RecordSet`].
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MissingProject`] if neither the config nor `default_project` names a project
    /// - [`ValidationError::MissingTrailingDot`] for a name that is not fully qualified
    /// - [`ValidationError::NegativeTtl`] for a negative TTL
    /// - [`ValidationError::MissingRecordData`] / [`ValidationError::ConflictingRecordData`]
    ///   unless exactly one of `rrdatas` and `routing_policy` is set
    /// - [`RoutingPolicyError`] if the routing policy does not name exactly one strategy
    pub fn resolve(&self, default_project: Option<&str>) -> Result<RecordSet, DnsError> {
        let project = self
            .project
            .as_deref()
            .or(default_project)
            .filter(|p| !p.is_empty())
            .ok_or(ValidationError::MissingProject)?;

        if self.managed_zone.is_empty() {
            return Err(ValidationError::InvalidConfig {
                field: "managed_zone".to_string(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }
        validate_trailing_dot("name", &self.name)?;
        if self.record_type.is_empty() {
            return Err(ValidationError::InvalidConfig {
                field: "type".to_string(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }
        if let Some(ttl) = self.ttl {
            validate_ttl(ttl)?;
        }

        // An empty rrdatas list next to a routing policy is how policies read back
        let rrdatas = match (&self.rrdatas, &self.routing_policy) {
            (Some(r), Some(_)) if r.is_empty() => None,
            (r, _) => r.as_ref(),
        };

        let data = match (rrdatas, &self.routing_policy) {
            (Some(rrdatas), None) => RecordData::Rrdatas(rrdatas.clone()),
            (None, Some(policy)) => RecordData::RoutingPolicy(policy.resolve()?),
            (Some(_), Some(_)) => {
                return Err(ValidationError::ConflictingRecordData {
                    name: self.name.clone(),
                }
                .into())
            }
            (None, None) => {
                return Err(ValidationError::MissingRecordData {
                    name: self.name.clone(),
                }
                .into())
            }
        };

        Ok(RecordSet {
            key: RecordSetKey {
                project: project.to_string(),
                managed_zone: self.managed_zone.clone(),
                name: self.name.clone(),
                record_type: self.record_type.clone(),
            },
            ttl: self.ttl,
            data,
        })
    }
}

impl From<&RecordSet> for RecordSetConfig {
    fn from(record_set: &RecordSet) -> Self {
        let (rrdatas, routing_policy) = match &record_set.data {
            RecordData::Rrdatas(rrdatas) => (Some(rrdatas.clone()), None),
            RecordData::RoutingPolicy(policy) => (None, Some(RoutingPolicyConfig::from(policy))),
        };
        Self {
            project: Some(record_set.key.project.clone()),
            managed_zone: record_set.key.managed_zone.clone(),
            name: record_set.key.name.clone(),
            record_type: record_set.key.record_type.clone(),
            ttl: record_set.ttl,
            rrdatas,
            routing_policy,
        }
    }
}
