// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for Cloud DNS record-set operations.
//!
//! This module provides specialized error types for:
//! - Cloud DNS / Compute REST API transport failures
//! - Input validation (record names, credentials, durations, enum values)
//! - Import identifier parsing
//! - URL template expansion
//! - Routing policy resolution
//!
//! [`DnsError`] is the composite type returned by the reconcilers. Every variant maps
//! to a stable reason string via [`DnsError::status_reason`].

use thiserror::Error;

use crate::http_errors::map_http_error_to_reason;
use crate::status_reasons::{
    REASON_AMBIGUOUS_RECORD_SET, REASON_API_CONNECTION_FAILED, REASON_API_DECODE_FAILED,
    REASON_API_INVALID_URL, REASON_API_RETRIES_EXHAUSTED, REASON_CHANGE_TIMEOUT,
    REASON_CONFLICTING_POLICY, REASON_AMBIGUOUS_POLICY, REASON_IMPORT_ID_NO_MATCH,
    REASON_INVALID_FIELD_VALUE, REASON_INVALID_IMPORT_PATTERN, REASON_RECORD_SET_NOT_FOUND,
    REASON_TEMPLATE_RECURSION, REASON_UNEXPECTED_CHANGE_STATUS, REASON_VALIDATION_FAILED,
};

/// Errors raised by the HTTP transport talking to Google APIs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The API answered with a non-success status code
    #[error("got HTTP response code {status} with body: {message} (url: {url})")]
    Http {
        /// HTTP status code
        status: u16,
        /// Request URL
        url: String,
        /// Response body or error message
        message: String,
    },

    /// The request never produced a response (DNS, TLS, connection refused, timeout)
    #[error("request to {url} failed: {reason}")]
    Connection {
        /// Request URL
        url: String,
        /// Underlying client error
        reason: String,
    },

    /// The response body could not be decoded into the expected shape
    #[error("failed to decode response from {url}: {reason}")]
    Decode {
        /// Request URL
        url: String,
        /// Decoder error
        reason: String,
    },

    /// A request URL could not be built from the configured base path
    #[error("invalid request URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL or base path
        url: String,
        /// Parser error
        reason: String,
    },

    /// Transient failures persisted past the retry budget
    #[error("giving up after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Message of the last failure
        last_error: String,
    },
}

impl ApiError {
    /// Returns true when the API reported that the addressed object does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }

    /// Returns true when the failure is worth retrying at the transport layer.
    ///
    /// Rate limiting (429), server errors (500, 502, 503, 504) and connection
    /// failures are transient. Other client errors are permanent.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Connection { .. } => true,
            Self::Decode { .. } | Self::InvalidUrl { .. } | Self::RetriesExhausted { .. } => false,
        }
    }
}

/// Input that was rejected before any remote call was made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A record name was empty
    #[error("{field}: the empty string is not a valid name field value")]
    EmptyName {
        /// Attribute that was validated
        field: String,
    },

    /// A record name did not end with a dot
    #[error("{field} ({value}) doesn't end with \".\", name field must end with trailing dot, for example test.example.com. (note the trailing dot)")]
    MissingTrailingDot {
        /// Attribute that was validated
        field: String,
        /// The rejected value
        value: String,
    },

    /// Credentials were neither an existing path nor valid JSON credentials
    #[error("JSON credentials are not valid: {reason}")]
    InvalidCredentials {
        /// Explanation of what is invalid
        reason: String,
    },

    /// A duration string could not be parsed
    #[error("expected {value} to be a duration: {reason}")]
    InvalidDuration {
        /// The rejected value
        value: String,
        /// Parser error
        reason: String,
    },

    /// A duration was negative where only non-negative values are allowed
    #[error("duration must be non-negative, duration provided: {value}")]
    NegativeDuration {
        /// The rejected value
        value: String,
    },

    /// A string attribute held a value outside its enumeration
    #[error("{field}: expected one of {allowed:?}, got \"{value}\"")]
    InvalidEnumValue {
        /// Attribute that was validated
        field: String,
        /// The rejected value
        value: String,
        /// Accepted values
        allowed: Vec<String>,
    },

    /// Neither the record set nor the provider named a project
    #[error("project: required field is not set (set it on the record set or the provider)")]
    MissingProject,

    /// Neither `rrdatas` nor `routing_policy` was set
    #[error("exactly one of rrdatas or routing_policy must be set for {name}")]
    MissingRecordData {
        /// Record name
        name: String,
    },

    /// Both `rrdatas` and `routing_policy` were set
    #[error("rrdatas and routing_policy are mutually exclusive for {name}")]
    ConflictingRecordData {
        /// Record name
        name: String,
    },

    /// A TTL was negative
    #[error("ttl must be non-negative, got {ttl}")]
    NegativeTtl {
        /// The rejected TTL
        ttl: i64,
    },

    /// A configuration value was malformed
    #[error("invalid configuration for {field}: {reason}")]
    InvalidConfig {
        /// Configuration key
        field: String,
        /// Explanation of what is invalid
        reason: String,
    },
}

/// Failures while parsing an import identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportIdError {
    /// None of the accepted formats matched
    #[error("Import id {id} doesn't match any of the accepted formats: {formats:?}")]
    NoMatch {
        /// The identifier that was parsed
        id: String,
        /// Accepted formats, in priority order
        formats: Vec<String>,
    },

    /// A captured value could not be coerced to its declared kind
    #[error("Error converting {value} to int for field {field}: {reason}")]
    InvalidFieldValue {
        /// Field name
        field: String,
        /// Captured value
        value: String,
        /// Parser error
        reason: String,
    },

    /// A format was not a valid regular expression
    #[error("Could not compile {pattern}: {reason}")]
    InvalidPattern {
        /// The pattern that failed to compile
        pattern: String,
        /// Compiler error
        reason: String,
    },

    /// A format matched but did not capture a required field
    #[error("Import id {id} matched but did not provide field {field}")]
    MissingField {
        /// The identifier that was parsed
        id: String,
        /// Missing field name
        field: String,
    },
}

/// Failures while expanding `{{var}}` templates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Substitution did not stabilize within the round limit
    #[error("Recursive substitution detected in '{template}': still unresolved after {rounds} rounds")]
    RecursionLimitExceeded {
        /// The original template
        template: String,
        /// Rounds performed before giving up
        rounds: usize,
    },
}

/// Failures while resolving a routing policy into exactly one strategy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingPolicyError {
    /// No strategy was given
    #[error("routing policy must set one of wrr, geo or primary_backup")]
    AmbiguousPolicy,

    /// More than one strategy was given
    #[error("routing policy strategies are mutually exclusive, got {variants:?}")]
    ConflictingPolicy {
        /// The strategies that were set
        variants: Vec<String>,
    },

    /// A primary-backup policy had no primary targets on the wire
    #[error("primary_backup policy is missing its primary targets")]
    MissingPrimaryTargets,
}

/// Composite error type returned by the record-set reconcilers.
#[derive(Error, Debug, Clone)]
pub enum DnsError {
    /// The addressed record set, zone or network does not exist
    #[error("{0}")]
    NotFound(String),

    /// More than one record set answered for a single (name, type) key
    #[error("only expected 1 record set for {name} {record_type}, {count} record sets were returned")]
    Ambiguous {
        /// Record name
        name: String,
        /// Record type
        record_type: String,
        /// Number of record sets returned
        count: usize,
    },

    /// A change did not reach `done` within the wait budget
    #[error("Error waiting for Google DNS change {change_id}: timeout after {timeout_secs}s (last status: {last_status})")]
    Timeout {
        /// The change being waited on
        change_id: String,
        /// Wait budget in seconds
        timeout_secs: u64,
        /// Last status observed
        last_status: String,
    },

    /// A change reported a status that is neither pending nor done
    #[error("unexpected state '{status}' for change {change_id}, wanted target 'done'")]
    UnexpectedChangeStatus {
        /// The change being waited on
        change_id: String,
        /// Status reported by the API
        status: String,
    },

    /// Transport failure talking to the API
    #[error(transparent)]
    Transport(#[from] ApiError),

    /// Input validation failure
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Import identifier failure
    #[error(transparent)]
    ImportId(#[from] ImportIdError),

    /// Template expansion failure
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Routing policy resolution failure
    #[error(transparent)]
    RoutingPolicy(#[from] RoutingPolicyError),
}

impl DnsError {
    /// Returns true if this error is transient and the operation may succeed when retried.
    ///
    /// Timeouts and retryable transport failures are transient. Validation, parsing and
    /// not-found errors will fail the same way again.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport(api) => api.is_retryable() || matches!(api, ApiError::RetriesExhausted { .. }),
            Self::NotFound(_)
            | Self::Ambiguous { .. }
            | Self::UnexpectedChangeStatus { .. }
            | Self::Validation(_)
            | Self::ImportId(_)
            | Self::Template(_)
            | Self::RoutingPolicy(_) => false,
        }
    }

    /// Returns the stable reason code for this error.
    ///
    /// This is used in diagnostics and as the `reason` label of error metrics.
    #[must_use]
    pub fn status_reason(&self) -> &'static str {
        match self {
            Self::NotFound(_) => REASON_RECORD_SET_NOT_FOUND,
            Self::Ambiguous { .. } => REASON_AMBIGUOUS_RECORD_SET,
            Self::Timeout { .. } => REASON_CHANGE_TIMEOUT,
            Self::UnexpectedChangeStatus { .. } => REASON_UNEXPECTED_CHANGE_STATUS,

            Self::Transport(ApiError::Http { status, .. }) => map_http_error_to_reason(*status).0,
            Self::Transport(ApiError::Connection { .. }) => REASON_API_CONNECTION_FAILED,
            Self::Transport(ApiError::Decode { .. }) => REASON_API_DECODE_FAILED,
            Self::Transport(ApiError::InvalidUrl { .. }) => REASON_API_INVALID_URL,
            Self::Transport(ApiError::RetriesExhausted { .. }) => REASON_API_RETRIES_EXHAUSTED,

            Self::Validation(_) => REASON_VALIDATION_FAILED,

            Self::ImportId(ImportIdError::NoMatch { .. } | ImportIdError::MissingField { .. }) => {
                REASON_IMPORT_ID_NO_MATCH
            }
            Self::ImportId(ImportIdError::InvalidFieldValue { .. }) => REASON_INVALID_FIELD_VALUE,
            Self::ImportId(ImportIdError::InvalidPattern { .. }) => REASON_INVALID_IMPORT_PATTERN,

            Self::Template(TemplateError::RecursionLimitExceeded { .. }) => {
                REASON_TEMPLATE_RECURSION
            }

            Self::RoutingPolicy(
                RoutingPolicyError::AmbiguousPolicy | RoutingPolicyError::MissingPrimaryTargets,
            ) => REASON_AMBIGUOUS_POLICY,
            Self::RoutingPolicy(RoutingPolicyError::ConflictingPolicy { .. }) => {
                REASON_CONFLICTING_POLICY
            }
        }
    }

    /// Returns true when the error means the remote object is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Transport(api) => api.is_not_found(),
            _ => false,
        }
    }
}
