// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Mapping between the declarative record-set model and the Cloud DNS wire shapes.
//!
//! [`expand`] turns a [`RoutingPolicy`] into the request body for exactly that
//! strategy, resolving health-checked target network references into full URLs.
//! [`flatten`] goes the other way and rejects wire policies that set zero or
//! several strategies. List order is preserved in both directions.
//!
//! [`expand_record_set`] and [`flatten_record_set`] do the same for whole record
//! sets.

use crate::api::types::{
    GeoPolicy as WireGeoPolicy, GeoPolicyItem, HealthCheckTargets,
    LoadBalancerTarget as WireLoadBalancerTarget, PrimaryBackupPolicy as WirePrimaryBackup,
    ResourceRecordSet, RrSetRoutingPolicy, WrrPolicy, WrrPolicyItem,
};
use crate::dns_errors::{DnsError, RoutingPolicyError};
use crate::model::{
    GeoItem, GeoPolicy, HealthCheckedTargets, LoadBalancerTarget, PrimaryBackupPolicy,
    RecordData, RecordSet, RecordSetKey, RoutingPolicy, WrrItem,
};
use crate::template::NetworkUrlResolver;

// ============================================================================
// Expand
// ============================================================================

/// Expand a routing policy into its wire representation.
///
/// # Errors
///
/// Returns [`DnsError::Template`] if a network reference cannot be expanded.
pub fn expand(
    policy: &RoutingPolicy,
    resolver: &NetworkUrlResolver,
) -> Result<RrSetRoutingPolicy, DnsError> {
    let wire = match policy {
        RoutingPolicy::WeightedRoundRobin(items) => RrSetRoutingPolicy {
            wrr: Some(WrrPolicy {
                items: items
                    .iter()
                    .map(|item| expand_wrr_item(item, resolver))
                    .collect::<Result<_, _>>()?,
            }),
            ..RrSetRoutingPolicy::default()
        },
        RoutingPolicy::Geo(geo) => RrSetRoutingPolicy {
            geo: Some(expand_geo(&geo.items, geo.enable_fencing, resolver)?),
            ..RrSetRoutingPolicy::default()
        },
        RoutingPolicy::PrimaryBackup(pb) => {
            // An absent backup block flattens to no items and no fencing.
            let backup_geo_targets =
                if pb.backup_geo.is_empty() && !pb.enable_fencing_for_backups {
                    None
                } else {
                    Some(expand_geo(
                        &pb.backup_geo,
                        pb.enable_fencing_for_backups,
                        resolver,
                    )?)
                };
            RrSetRoutingPolicy {
                primary_backup: Some(WirePrimaryBackup {
                    primary_targets: Some(expand_targets(&pb.primary_targets, resolver)?),
                    backup_geo_targets,
                    trickle_traffic: pb.trickle_ratio,
                }),
                ..RrSetRoutingPolicy::default()
            }
        }
    };
    Ok(wire)
}

fn expand_wrr_item(
    item: &WrrItem,
    resolver: &NetworkUrlResolver,
) -> Result<WrrPolicyItem, DnsError> {
    Ok(WrrPolicyItem {
        weight: item.weight,
        rrdatas: item.rrdatas.clone(),
        health_checked_targets: item
            .health_checked_targets
            .as_ref()
            .map(|t| expand_targets(t, resolver))
            .transpose()?,
    })
}

fn expand_geo(
    items: &[GeoItem],
    enable_fencing: bool,
    resolver: &NetworkUrlResolver,
) -> Result<WireGeoPolicy, DnsError> {
    let items = items
        .iter()
        .map(|item| {
            Ok(GeoPolicyItem {
                location: item.location.clone(),
                rrdatas: item.rrdatas.clone(),
                health_checked_targets: item
                    .health_checked_targets
                    .as_ref()
                    .map(|t| expand_targets(t, resolver))
                    .transpose()?,
            })
        })
        .collect::<Result<_, DnsError>>()?;
    Ok(WireGeoPolicy {
        items,
        enable_fencing,
    })
}

fn expand_targets(
    targets: &HealthCheckedTargets,
    resolver: &NetworkUrlResolver,
) -> Result<HealthCheckTargets, DnsError> {
    let internal_load_balancers = targets
        .internal_load_balancers
        .iter()
        .map(|lb| {
            Ok(WireLoadBalancerTarget {
                load_balancer_type: lb.load_balancer_type.as_str().to_string(),
                ip_address: lb.ip_address.clone(),
                port: lb.port.clone(),
                ip_protocol: lb.ip_protocol.as_str().to_string(),
                network_url: resolver.resolve(&lb.network_url)?,
                project: lb.project.clone(),
                region: lb.region.clone().unwrap_or_default(),
            })
        })
        .collect::<Result<_, DnsError>>()?;
    Ok(HealthCheckTargets {
        internal_load_balancers,
    })
}

// ============================================================================
// Flatten
// ============================================================================

/// Flatten a wire routing policy into the declarative model.
///
/// # Errors
///
/// - [`RoutingPolicyError::AmbiguousPolicy`] if no strategy is set
/// - [`RoutingPolicyError::ConflictingPolicy`] if more than one is
/// - [`RoutingPolicyError::MissingPrimaryTargets`] for a primary-backup policy
///   without primary targets
/// - [`crate::dns_errors::ValidationError::InvalidEnumValue`] for an unknown load
///   balancer type or protocol
pub fn flatten(wire: &RrSetRoutingPolicy) -> Result<RoutingPolicy, DnsError> {
    let mut variants = Vec::new();
    if wire.wrr.is_some() {
        variants.push("wrr".to_string());
    }
    if wire.geo.is_some() {
        variants.push("geo".to_string());
    }
    if wire.primary_backup.is_some() {
        variants.push("primary_backup".to_string());
    }
    if variants.len() > 1 {
        return Err(RoutingPolicyError::ConflictingPolicy { variants }.into());
    }

    if let Some(wrr) = &wire.wrr {
        let items = wrr
            .items
            .iter()
            .map(|item| {
                Ok(WrrItem {
                    weight: item.weight,
                    rrdatas: item.rrdatas.clone(),
                    health_checked_targets: item
                        .health_checked_targets
                        .as_ref()
                        .map(flatten_targets)
                        .transpose()?,
                })
            })
            .collect::<Result<_, DnsError>>()?;
        return Ok(RoutingPolicy::WeightedRoundRobin(items));
    }

    if let Some(geo) = &wire.geo {
        return Ok(RoutingPolicy::Geo(GeoPolicy {
            items: flatten_geo_items(&geo.items)?,
            enable_fencing: geo.enable_fencing,
        }));
    }

    if let Some(pb) = &wire.primary_backup {
        let primary = pb
            .primary_targets
            .as_ref()
            .ok_or(RoutingPolicyError::MissingPrimaryTargets)?;
        let (backup_geo, enable_fencing_for_backups) = match &pb.backup_geo_targets {
            Some(geo) => (flatten_geo_items(&geo.items)?, geo.enable_fencing),
            None => (Vec::new(), false),
        };
        return Ok(RoutingPolicy::PrimaryBackup(PrimaryBackupPolicy {
            primary_targets: flatten_targets(primary)?,
            backup_geo,
            enable_fencing_for_backups,
            trickle_ratio: pb.trickle_traffic,
        }));
    }

    Err(RoutingPolicyError::AmbiguousPolicy.into())
}

fn flatten_geo_items(items: &[GeoPolicyItem]) -> Result<Vec<GeoItem>, DnsError> {
    items
        .iter()
        .map(|item| {
            Ok(GeoItem {
                location: item.location.clone(),
                rrdatas: item.rrdatas.clone(),
                health_checked_targets: item
                    .health_checked_targets
                    .as_ref()
                    .map(flatten_targets)
                    .transpose()?,
            })
        })
        .collect()
}

fn flatten_targets(targets: &HealthCheckTargets) -> Result<HealthCheckedTargets, DnsError> {
    let internal_load_balancers = targets
        .internal_load_balancers
        .iter()
        .map(|lb| {
            Ok(LoadBalancerTarget {
                load_balancer_type: lb.load_balancer_type.parse()?,
                ip_address: lb.ip_address.clone(),
                port: lb.port.clone(),
                ip_protocol: lb.ip_protocol.parse()?,
                network_url: lb.network_url.clone(),
                project: lb.project.clone(),
                region: Some(lb.region.clone()).filter(|r| !r.is_empty()),
            })
        })
        .collect::<Result<_, DnsError>>()?;
    Ok(HealthCheckedTargets {
        internal_load_balancers,
    })
}

// ============================================================================
// Record Sets
// ============================================================================

/// Build the wire record set for a declarative one.
///
/// # Errors
///
/// Returns [`DnsError::Template`] if a routing-policy network reference cannot be
/// expanded.
pub fn expand_record_set(
    record_set: &RecordSet,
    resolver: &NetworkUrlResolver,
) -> Result<ResourceRecordSet, DnsError> {
    let (rrdatas, routing_policy) = match &record_set.data {
        RecordData::Rrdatas(rrdatas) => (rrdatas.clone(), None),
        RecordData::RoutingPolicy(policy) => (Vec::new(), Some(expand(policy, resolver)?)),
    };
    Ok(ResourceRecordSet {
        name: record_set.key.name.clone(),
        record_type: record_set.key.record_type.clone(),
        ttl: record_set.ttl.unwrap_or(0),
        rrdatas,
        routing_policy,
        kind: None,
    })
}

/// Build the declarative record set for a wire one read from `project`/`managed_zone`.
///
/// A zero TTL reads back as unset.
///
/// # Errors
///
/// Returns the errors of [`flatten`] for a record set with a routing policy.
pub fn flatten_record_set(
    project: &str,
    managed_zone: &str,
    rrset: &ResourceRecordSet,
) -> Result<RecordSet, DnsError> {
    let data = match &rrset.routing_policy {
        Some(policy) => RecordData::RoutingPolicy(flatten(policy)?),
        None => RecordData::Rrdatas(rrset.rrdatas.clone()),
    };
    Ok(RecordSet {
        key: RecordSetKey {
            project: project.to_string(),
            managed_zone: managed_zone.to_string(),
            name: rrset.name.clone(),
            record_type: rrset.record_type.clone(),
        },
        ttl: Some(rrset.ttl).filter(|ttl| *ttl != 0),
        data,
    })
}
