// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for gcdns.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// API Endpoints
// ============================================================================

/// Default base path of the Cloud DNS v1 REST API
pub const DEFAULT_DNS_BASE_PATH: &str = "https://dns.googleapis.com/dns/v1/";

/// Default base path of the Compute Engine v1 REST API
pub const DEFAULT_COMPUTE_BASE_PATH: &str = "https://compute.googleapis.com/compute/v1/";

/// Sentinel project that clears the `X-Goog-User-Project` header
pub const NO_BILLING_PROJECT_OVERRIDE: &str = "NO_BILLING_PROJECT_OVERRIDE";

/// Header used to bill requests against a user project
pub const USER_PROJECT_HEADER: &str = "X-Goog-User-Project";

/// Product token sent at the start of every `User-Agent` header
pub const USER_AGENT_PRODUCT: &str = "gcdns";

/// Default per-request timeout (Go-style duration)
pub const DEFAULT_REQUEST_TIMEOUT: &str = "120s";

// ============================================================================
// Environment Variables
// ============================================================================

/// Default project for record sets that do not name one
pub const ENV_PROJECT: &str = "GOOGLE_PROJECT";

/// Path to, or contents of, a JSON credentials file
pub const ENV_CREDENTIALS: &str = "GOOGLE_CREDENTIALS";

/// OAuth2 access token used as a bearer token
pub const ENV_ACCESS_TOKEN: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Override for the Cloud DNS base path
pub const ENV_DNS_CUSTOM_ENDPOINT: &str = "GOOGLE_DNS_CUSTOM_ENDPOINT";

/// Override for the Compute Engine base path
pub const ENV_COMPUTE_CUSTOM_ENDPOINT: &str = "GOOGLE_COMPUTE_CUSTOM_ENDPOINT";

/// Billing project used when `user_project_override` is enabled
pub const ENV_BILLING_PROJECT: &str = "GOOGLE_BILLING_PROJECT";

// ============================================================================
// DNS Record Constants
// ============================================================================

/// Record type of nameserver delegations
pub const RECORD_TYPE_NS: &str = "NS";

/// Record type of the zone's start of authority
pub const RECORD_TYPE_SOA: &str = "SOA";

/// Only accepted internal load balancer type
pub const LOAD_BALANCER_TYPE_REGIONAL_L4_ILB: &str = "regionalL4ilb";

/// Internal load balancer protocol: TCP
pub const IP_PROTOCOL_TCP: &str = "tcp";

/// Internal load balancer protocol: UDP
pub const IP_PROTOCOL_UDP: &str = "udp";

// ============================================================================
// Change Waiter Constants
// ============================================================================

/// Status of a change that is still being applied
pub const CHANGE_STATUS_PENDING: &str = "pending";

/// Status of a change that has been fully applied
pub const CHANGE_STATUS_DONE: &str = "done";

/// Minimum spacing between change status polls (2 seconds)
pub const CHANGE_POLL_MIN_INTERVAL_SECS: u64 = 2;

/// Maximum spacing between change status polls (10 seconds)
pub const CHANGE_POLL_MAX_INTERVAL_SECS: u64 = 10;

/// Overall budget for a change to reach `done` (10 minutes)
pub const CHANGE_WAIT_TIMEOUT_SECS: u64 = 600;

// ============================================================================
// Template Constants
// ============================================================================

/// Maximum number of substitution rounds before a template is considered runaway
pub const MAX_TEMPLATE_EXPANSION_ROUNDS: usize = 10;

// ============================================================================
// Sweeper Constants
// ============================================================================

/// Name prefix of record sets created by acceptance tests
pub const SWEEPER_TEST_PREFIX: &str = "tf-test";

// ============================================================================
// State File Constants
// ============================================================================

/// Current schema version of the state file
pub const STATE_FILE_VERSION: u32 = 1;
