// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Read-only lookups of managed zones and compute networks.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::{ComputeApi, DnsApi};
use crate::dns_errors::{DnsError, ValidationError};

/// A managed zone as exposed by the zone data source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedZoneData {
    /// `projects/{project}/managedZones/{name}`
    pub id: String,
    /// Zone name
    pub name: String,
    /// Project owning the zone
    pub project: String,
    /// DNS name with trailing dot
    pub dns_name: String,
    /// Description
    pub description: String,
    /// Numeric zone id
    pub managed_zone_id: u64,
    /// Authoritative name servers
    pub name_servers: Vec<String>,
    /// `public` or `private`
    pub visibility: String,
}

/// A compute network as exposed by the network data source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkData {
    /// `projects/{project}/global/networks/{name}`
    pub id: String,
    /// Network name
    pub name: String,
    /// Project owning the network
    pub project: String,
    /// Description
    pub description: String,
    /// Gateway address of legacy networks
    pub gateway_ipv4: String,
    /// Self link
    pub self_link: String,
    /// Subnetwork self links
    pub subnetworks_self_links: Vec<String>,
}

/// Look up a managed zone.
///
/// # Errors
///
/// Returns [`DnsError::Transport`] on failure, including 404 for a missing zone,
/// and [`ValidationError::InvalidConfig`] if the service returns a non-numeric id.
pub async fn read_managed_zone(
    api: &dyn DnsApi,
    project: &str,
    name: &str,
) -> Result<ManagedZoneData, DnsError> {
    let zone = api.get_managed_zone(project, name).await?;
    let managed_zone_id = zone
        .id
        .parse::<u64>()
        .map_err(|e| ValidationError::InvalidConfig {
            field: "managed_zone_id".to_string(),
            reason: format!("{}: {e}", zone.id),
        })?;

    debug!(project = %project, managed_zone = %name, dns_name = %zone.dns_name, "Read managed zone");
    Ok(ManagedZoneData {
        id: format!("projects/{project}/managedZones/{name}"),
        name: name.to_string(),
        project: project.to_string(),
        dns_name: zone.dns_name,
        description: zone.description,
        managed_zone_id,
        name_servers: zone.name_servers,
        visibility: zone.visibility,
    })
}

/// Look up a compute network.
///
/// # Errors
///
/// Returns [`DnsError::NotFound`] if the network does not exist and
/// [`DnsError::Transport`] for any other failure.
pub async fn read_compute_network(
    api: &dyn ComputeApi,
    project: &str,
    name: &str,
) -> Result<NetworkData, DnsError> {
    let network = match api.get_network(project, name).await {
        Ok(network) => network,
        Err(e) if e.is_not_found() => {
            return Err(DnsError::NotFound(format!("Network Not Found : {name}")))
        }
        Err(e) => return Err(e.into()),
    };

    debug!(project = %project, network = %name, "Read compute network");
    Ok(NetworkData {
        id: format!("projects/{project}/global/networks/{name}"),
        name: name.to_string(),
        project: project.to_string(),
        description: network.description,
        gateway_ipv4: network.gateway_ipv4,
        self_link: network.self_link,
        subnetworks_self_links: network.subnetworks,
    })
}
