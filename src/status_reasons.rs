// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Stable reason codes for record-set diagnostics.
//!
//! Reasons are programmatic identifiers in CamelCase that explain why an operation
//! failed. They appear in CLI diagnostics and as the `reason` label of the error
//! metrics, so their values must not change between releases.

// ============================================================================
// Record Set Reasons
// ============================================================================

/// The record set, zone or network does not exist.
pub const REASON_RECORD_SET_NOT_FOUND: &str = "RecordSetNotFound";

/// More than one record set matched a (name, type) key.
pub const REASON_AMBIGUOUS_RECORD_SET: &str = "AmbiguousRecordSet";

/// Input was rejected before any API call.
pub const REASON_VALIDATION_FAILED: &str = "ValidationFailed";

// ============================================================================
// Change Reasons
// ============================================================================

/// A change stayed pending past the wait budget.
pub const REASON_CHANGE_TIMEOUT: &str = "ChangeTimeout";

/// A change reported a status other than pending or done.
pub const REASON_UNEXPECTED_CHANGE_STATUS: &str = "UnexpectedChangeStatus";

// ============================================================================
// Import / Template / Policy Reasons
// ============================================================================

/// The import id matched none of the accepted formats.
pub const REASON_IMPORT_ID_NO_MATCH: &str = "ImportIdNoMatch";

/// A captured import field had the wrong type.
pub const REASON_INVALID_FIELD_VALUE: &str = "InvalidFieldValue";

/// An import format failed to compile.
pub const REASON_INVALID_IMPORT_PATTERN: &str = "InvalidImportPattern";

/// A URL template never stabilized.
pub const REASON_TEMPLATE_RECURSION: &str = "TemplateRecursionLimit";

/// A routing policy named no strategy.
pub const REASON_AMBIGUOUS_POLICY: &str = "AmbiguousRoutingPolicy";

/// A routing policy named more than one strategy.
pub const REASON_CONFLICTING_POLICY: &str = "ConflictingRoutingPolicy";

// ============================================================================
// API Transport Reasons
// ============================================================================

/// HTTP 400 from the API.
///
/// The request body or query parameters were rejected, typically because a change
/// deletion did not match the existing record set exactly.
pub const REASON_API_BAD_REQUEST: &str = "ApiBadRequest";

/// HTTP 401 or 403 from the API.
pub const REASON_API_AUTH_FAILED: &str = "ApiAuthFailed";

/// HTTP 404 from the API.
pub const REASON_API_NOT_FOUND: &str = "ApiNotFound";

/// HTTP 409 from the API (record set already exists).
pub const REASON_API_CONFLICT: &str = "ApiConflict";

/// HTTP 412 from the API (a change precondition failed).
pub const REASON_API_PRECONDITION_FAILED: &str = "ApiPreconditionFailed";

/// HTTP 429 from the API.
pub const REASON_API_RATE_LIMITED: &str = "ApiRateLimited";

/// HTTP 500 from the API.
pub const REASON_API_INTERNAL_ERROR: &str = "ApiInternalError";

/// HTTP 502, 503 or 504 between us and the API.
pub const REASON_GATEWAY_ERROR: &str = "GatewayError";

/// Any other unexpected status.
pub const REASON_API_UNEXPECTED_STATUS: &str = "ApiUnexpectedStatus";

/// The API could not be reached at all.
pub const REASON_API_CONNECTION_FAILED: &str = "ApiConnectionFailed";

/// The API answered with a body we could not decode.
pub const REASON_API_DECODE_FAILED: &str = "ApiDecodeFailed";

/// A request URL could not be built.
pub const REASON_API_INVALID_URL: &str = "ApiInvalidUrl";

/// Transient failures outlasted the retry budget.
pub const REASON_API_RETRIES_EXHAUSTED: &str = "ApiRetriesExhausted";
