// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP error code mapping to diagnostic reasons.
//!
//! This module maps HTTP status codes returned by the Cloud DNS and Compute APIs
//! to the standardized reasons in [`crate::status_reasons`]. This enables consistent
//! error reporting and troubleshooting across the CLI and the metrics.
//!
//! # Usage
//!
//! ```rust
//! use gcdns::http_errors::map_http_error_to_reason;
//!
//! let (reason, message) = map_http_error_to_reason(404);
//! assert_eq!(reason, "ApiNotFound");
//!
//! let (reason, message) = map_http_error_to_reason(500);
//! assert_eq!(reason, "ApiInternalError");
//! ```

use crate::status_reasons::{
    REASON_API_AUTH_FAILED, REASON_API_BAD_REQUEST, REASON_API_CONFLICT,
    REASON_API_CONNECTION_FAILED, REASON_API_INTERNAL_ERROR, REASON_API_NOT_FOUND,
    REASON_API_PRECONDITION_FAILED, REASON_API_RATE_LIMITED, REASON_API_UNEXPECTED_STATUS,
    REASON_GATEWAY_ERROR,
};

/// Map HTTP status code to reason and message.
///
/// # HTTP Code Mapping
///
/// | HTTP Code | Reason | Meaning |
/// |-----------|--------|---------|
/// | 400 | `ApiBadRequest` | Invalid request, e.g. a deletion that does not match |
/// | 401 | `ApiAuthFailed` | Authentication required |
/// | 403 | `ApiAuthFailed` | Insufficient permissions |
/// | 404 | `ApiNotFound` | Zone, change or record set not found |
/// | 409 | `ApiConflict` | Record set already exists |
/// | 412 | `ApiPreconditionFailed` | Change precondition failed |
/// | 429 | `ApiRateLimited` | Quota or rate limit exceeded |
/// | 500 | `ApiInternalError` | Internal server error |
/// | 502 | `GatewayError` | Bad gateway |
/// | 503 | `GatewayError` | Service unavailable |
/// | 504 | `GatewayError` | Gateway timeout |
/// | Other | `ApiUnexpectedStatus` | Unexpected error |
///
/// # Example
///
/// ```rust
/// use gcdns::http_errors::map_http_error_to_reason;
///
/// let (reason, message) = map_http_error_to_reason(409);
/// assert_eq!(reason, "ApiConflict");
/// assert!(message.contains("409"));
/// ```
#[must_use]
pub fn map_http_error_to_reason(status_code: u16) -> (&'static str, String) {
    match status_code {
        400 => (
            REASON_API_BAD_REQUEST,
            "Invalid request to Google API (400)".into(),
        ),
        401 => (
            REASON_API_AUTH_FAILED,
            "Google API authentication required (401)".into(),
        ),
        403 => (
            REASON_API_AUTH_FAILED,
            "Google API authorization failed (403)".into(),
        ),
        404 => (
            REASON_API_NOT_FOUND,
            "Zone, change or record set not found (404)".into(),
        ),
        409 => (
            REASON_API_CONFLICT,
            "Record set already exists (409)".into(),
        ),
        412 => (
            REASON_API_PRECONDITION_FAILED,
            "Change precondition failed (412)".into(),
        ),
        429 => (
            REASON_API_RATE_LIMITED,
            "Google API rate limit exceeded (429)".into(),
        ),
        500 => (
            REASON_API_INTERNAL_ERROR,
            "Google API internal error (500)".into(),
        ),
        502 => (
            REASON_GATEWAY_ERROR,
            "Bad gateway reaching Google API (502)".into(),
        ),
        503 => (
            REASON_GATEWAY_ERROR,
            "Google API service unavailable (503)".into(),
        ),
        504 => (
            REASON_GATEWAY_ERROR,
            "Gateway timeout reaching Google API (504)".into(),
        ),
        _ => (
            REASON_API_UNEXPECTED_STATUS,
            format!("Unexpected HTTP error from Google API ({status_code})"),
        ),
    }
}

/// Map connection error to reason and message.
///
/// Use this when the HTTP client cannot reach the API at all, before receiving
/// any HTTP status code.
///
/// # Common Causes
///
/// - Custom endpoint pointing at a host that is down
/// - Proxy or firewall blocking traffic
/// - DNS resolution failure
/// - Request timeout
#[must_use]
pub fn map_connection_error() -> (&'static str, String) {
    (
        REASON_API_CONNECTION_FAILED,
        "Cannot connect to Google API".into(),
    )
}

/// Map a status code to the low-cardinality class used as a metrics label.
#[must_use]
pub fn status_class(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "2xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}
