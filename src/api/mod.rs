// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Google Cloud DNS and Compute API access.
//!
//! The reconcilers only see the [`DnsApi`] and [`ComputeApi`] traits. The production
//! implementation is [`client::CloudDnsClient`], a `reqwest`-based REST client with
//! retry; tests substitute an in-memory implementation.
//!
//! # Example
//!
//! ```rust,no_run
//! use gcdns::api::{client::CloudDnsClient, DnsApi, RecordSetFilter};
//! use gcdns::provider::ProviderConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = CloudDnsClient::new(&ProviderConfig::default())?;
//! let rrsets = client
//!     .list_record_sets("my-project", "prod-zone", &RecordSetFilter::default())
//!     .await?;
//! println!("{} record sets", rrsets.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
#[cfg(test)]
pub mod memory;
pub mod types;

use async_trait::async_trait;

use crate::dns_errors::ApiError;

pub use types::{
    Change, ChangeStatus, ManagedZone, Network, RecordSetFilter, ResourceRecordSet,
};

/// Cloud DNS operations used by the reconcilers.
#[async_trait]
pub trait DnsApi: Send + Sync {
    /// List record sets in a zone, following pagination to the end.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure.
    async fn list_record_sets(
        &self,
        project: &str,
        managed_zone: &str,
        filter: &RecordSetFilter,
    ) -> Result<Vec<ResourceRecordSet>, ApiError>;

    /// Submit an atomic change.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure. A deletion that does not match
    /// an existing record set is reported by the service as 404.
    async fn create_change(
        &self,
        project: &str,
        managed_zone: &str,
        change: &Change,
    ) -> Result<Change, ApiError>;

    /// Fetch a change to observe its status.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure.
    async fn get_change(
        &self,
        project: &str,
        managed_zone: &str,
        change_id: &str,
    ) -> Result<Change, ApiError>;

    /// Fetch a managed zone.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, including 404 for a missing zone.
    async fn get_managed_zone(
        &self,
        project: &str,
        managed_zone: &str,
    ) -> Result<ManagedZone, ApiError>;
}

/// Compute operations used by the network data source.
#[async_trait]
pub trait ComputeApi: Send + Sync {
    /// Fetch a global network.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, including 404 for a missing network.
    async fn get_network(&self, project: &str, network: &str) -> Result<Network, ApiError>;
}
