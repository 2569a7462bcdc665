// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconciliation of Cloud DNS record sets.
//!
//! Reconcilers compare a declared [`crate::model::RecordSet`] with what the API
//! reports and submit the atomic change that converges the two.
//!
//! # Reconciliation Flow
//!
//! 1. **Plan** - Compare the recorded prior state with the desired state
//! 2. **Submit** - Send one change with the additions and deletions
//! 3. **Wait** - Poll the change until it is `done`
//! 4. **Read back** - Return the canonical state as the API now reports it
//!
//! # Example: Applying a Record Set
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gcdns::api::client::CloudDnsClient;
//! use gcdns::model::RecordSetConfig;
//! use gcdns::provider::ProviderConfig;
//! use gcdns::reconcilers::RecordSetReconciler;
//!
//! async fn apply(config: RecordSetConfig) -> anyhow::Result<()> {
//!     let provider = ProviderConfig::default();
//!     let client = Arc::new(CloudDnsClient::new(&provider)?);
//!     let reconciler = RecordSetReconciler::new(client, &provider.compute_base_path);
//!
//!     let desired = config.resolve(provider.project.as_deref())?;
//!     let state = reconciler.apply(None, &desired).await?;
//!     println!("{}", state.key);
//!     Ok(())
//! }
//! ```

pub mod change_waiter;
pub mod record_set;
pub mod retry;

pub use change_waiter::{wait_for_change, WaitConfig, WaitOutcome};
pub use record_set::{DeleteOutcome, Plan, RecordSetReconciler};
