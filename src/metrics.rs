// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for record-set reconciliation.
//!
//! This module provides metrics collection with the namespace prefix `gcdns`.
//!
//! # Metrics Categories
//!
//! - **Reconciliation Metrics** - Track reconciler operations and their outcomes
//! - **Record Set Lifecycle Metrics** - Track record sets created, updated and deleted
//! - **Change Metrics** - Track submitted changes and how long they take to apply
//! - **API Metrics** - Track Google API requests and retries
//!
//! # Example
//!
//! ```rust,no_run
//! use gcdns::metrics::record_reconciliation_success;
//!
//! record_reconciliation_success("create", std::time::Duration::from_secs(1));
//! ```

use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all metrics (prometheus-safe)
const METRICS_NAMESPACE: &str = "gcdns";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
///
/// All metrics are registered in this registry and rendered by [`gather_metrics`].
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Reconciliation Metrics
// ============================================================================

/// Total number of reconciler operations by operation and status
///
/// Labels:
/// - `operation`: `create`, `read`, `update`, `delete`, `import`, `apply`
/// - `status`: Outcome (`success`, `error`)
pub static RECONCILIATION_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_reconciliations_total"),
        "Total number of reconciler operations by operation and status",
    );
    let counter = CounterVec::new(opts, &["operation", "status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of reconciler operations in seconds
///
/// Labels:
/// - `operation`: Reconciler operation
pub static RECONCILIATION_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_reconciliation_duration_seconds"),
        "Duration of reconciler operations in seconds by operation",
    )
    .buckets(vec![0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 300.0, 600.0]);
    let histogram = HistogramVec::new(opts, &["operation"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

/// Total number of errors by operation and reason
///
/// Labels:
/// - `operation`: Reconciler operation
/// - `reason`: Stable reason code from [`crate::status_reasons`]
pub static ERRORS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_errors_total"),
        "Total number of errors by operation and reason",
    );
    let counter = CounterVec::new(opts, &["operation", "reason"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Record Set Lifecycle Metrics
// ============================================================================

/// Total number of record sets created, updated or deleted
///
/// Labels:
/// - `record_type`: DNS record type
/// - `action`: `created`, `updated`, `deleted`, `skipped`
pub static RECORD_SETS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_record_sets_total"),
        "Total number of record set lifecycle actions by record type",
    );
    let counter = CounterVec::new(opts, &["record_type", "action"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Change Metrics
// ============================================================================

/// Total number of changes submitted
///
/// Labels:
/// - `operation`: Reconciler operation that submitted the change
pub static CHANGES_SUBMITTED_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_changes_submitted_total"),
        "Total number of DNS changes submitted by operation",
    );
    let counter = CounterVec::new(opts, &["operation"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Time spent waiting for changes to apply, in seconds
///
/// Labels:
/// - `outcome`: `done`, `timeout`, `error`
pub static CHANGE_WAIT_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_change_wait_duration_seconds"),
        "Time spent waiting for DNS changes to apply by outcome",
    )
    .buckets(vec![0.0, 2.0, 6.0, 14.0, 30.0, 60.0, 120.0, 300.0, 600.0]);
    let histogram = HistogramVec::new(opts, &["outcome"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

/// Number of status polls per waited change
///
/// Labels:
/// - `outcome`: `done`, `timeout`, `error`
pub static CHANGE_WAIT_POLLS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_change_wait_polls"),
        "Number of change status polls per waited change by outcome",
    )
    .buckets(vec![1.0, 2.0, 3.0, 5.0, 10.0, 20.0, 40.0, 80.0]);
    let histogram = HistogramVec::new(opts, &["outcome"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

// ============================================================================
// API Metrics
// ============================================================================

/// Total number of Google API requests by method and status class
///
/// Labels:
/// - `method`: HTTP method
/// - `status_class`: `2xx`, `4xx`, `5xx`, `other`, `error`
pub static API_REQUESTS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_api_requests_total"),
        "Total number of Google API requests by method and status class",
    );
    let counter = CounterVec::new(opts, &["method", "status_class"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Total number of Google API retries by operation
///
/// Labels:
/// - `operation`: Human-readable API operation name
pub static API_RETRIES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_api_retries_total"),
        "Total number of Google API request retries by operation",
    );
    let counter = CounterVec::new(opts, &["operation"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record a successful reconciler operation
///
/// # Arguments
/// * `operation` - The reconciler operation (e.g., `create`)
/// * `duration` - Duration of the operation
pub fn record_reconciliation_success(operation: &str, duration: Duration) {
    RECONCILIATION_TOTAL
        .with_label_values(&[operation, "success"])
        .inc();
    RECONCILIATION_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(duration.as_secs_f64());
}

/// Record a failed reconciler operation
///
/// # Arguments
/// * `operation` - The reconciler operation
/// * `reason` - Stable reason code of the failure
/// * `duration` - Duration of the operation before failure
pub fn record_reconciliation_error(operation: &str, reason: &str, duration: Duration) {
    RECONCILIATION_TOTAL
        .with_label_values(&[operation, "error"])
        .inc();
    RECONCILIATION_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(duration.as_secs_f64());
    ERRORS_TOTAL.with_label_values(&[operation, reason]).inc();
}

/// Record a record-set lifecycle action
///
/// # Arguments
/// * `record_type` - DNS record type
/// * `action` - `created`, `updated`, `deleted` or `skipped`
pub fn record_record_set_action(record_type: &str, action: &str) {
    RECORD_SETS_TOTAL
        .with_label_values(&[record_type, action])
        .inc();
}

/// Record a submitted change
pub fn record_change_submitted(operation: &str) {
    CHANGES_SUBMITTED_TOTAL
        .with_label_values(&[operation])
        .inc();
}

/// Record how a change wait ended
///
/// # Arguments
/// * `outcome` - `done`, `timeout` or `error`
/// * `polls` - Number of status polls made
/// * `elapsed` - Time spent waiting
pub fn record_change_wait(outcome: &str, polls: u32, elapsed: Duration) {
    CHANGE_WAIT_DURATION_SECONDS
        .with_label_values(&[outcome])
        .observe(elapsed.as_secs_f64());
    CHANGE_WAIT_POLLS
        .with_label_values(&[outcome])
        .observe(f64::from(polls));
}

/// Record a Google API request
pub fn record_api_request(method: &str, status_class: &str) {
    API_REQUESTS_TOTAL
        .with_label_values(&[method, status_class])
        .inc();
}

/// Record a Google API retry
pub fn record_api_retry(operation: &str) {
    API_RETRIES_TOTAL.with_label_values(&[operation]).inc();
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}
