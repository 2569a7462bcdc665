// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # gcdns - Declarative Google Cloud DNS record sets
//!
//! gcdns keeps Google Cloud DNS record sets in line with a declared state. A record
//! set is identified by `(project, managed_zone, name, type)` and carries either
//! static record data or a routing policy (weighted round robin, geolocation, or
//! primary with geolocation backup).
//!
//! ## Overview
//!
//! Every mutation is one atomic Cloud DNS change followed by a blocking wait until
//! the change is `done`. The library provides:
//!
//! - Configuration and resolved models for record sets and routing policies
//! - Mapping between that model and the Cloud DNS REST shapes
//! - Create, read, update, delete, import and plan/apply reconciliation
//! - Managed-zone and compute-network lookups
//! - A sweeper for record sets left behind by test runs
//!
//! ## Modules
//!
//! - [`model`] - Record-set and routing-policy types
//! - [`api`] - Cloud DNS and Compute API traits and the REST client
//! - [`routing_policy`] - Model to wire mapping
//! - [`reconcilers`] - Record-set reconciler, change waiter and retry
//! - [`import_id`] - Import identifier parsing
//! - [`template`] - `{{var}}` URL templates and network URL resolution
//! - [`provider`] - Provider configuration
//! - [`data_sources`] - Managed-zone and network lookups
//! - [`sweeper`] - Test record-set cleanup
//! - [`state`] - Local state file
//!
//! ## Example
//!
//! ```rust
//! use gcdns::model::{RecordData, RecordSetConfig};
//!
//! let config = RecordSetConfig {
//!     project: None,
//!     managed_zone: "prod-zone".to_string(),
//!     name: "www.example.com.".to_string(),
//!     record_type: "A".to_string(),
//!     ttl: Some(300),
//!     rrdatas: Some(vec!["192.168.1.1".to_string()]),
//!     routing_policy: None,
//! };
//!
//! let record_set = config.resolve(Some("my-project")).unwrap();
//! assert!(matches!(record_set.data, RecordData::Rrdatas(_)));
//! ```

pub mod api;
pub mod constants;
pub mod data_sources;
pub mod dns_errors;
pub mod http_errors;
pub mod import_id;
pub mod metrics;
pub mod model;
pub mod provider;
pub mod reconcilers;
pub mod routing_policy;
pub mod state;
pub mod status_reasons;
pub mod sweeper;
pub mod template;
pub mod validation;

#[cfg(test)]
mod http_errors_tests;
#[cfg(test)]
mod status_reasons_tests;
#[cfg(test)]
mod template_tests;
