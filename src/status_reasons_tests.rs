// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `status_reasons` module
//!
//! Reason values are used as metric labels and must stay stable.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::status_reasons::*;

    const ALL_REASONS: &[&str] = &[
        REASON_RECORD_SET_NOT_FOUND,
        REASON_AMBIGUOUS_RECORD_SET,
        REASON_VALIDATION_FAILED,
        REASON_CHANGE_TIMEOUT,
        REASON_UNEXPECTED_CHANGE_STATUS,
        REASON_IMPORT_ID_NO_MATCH,
        REASON_INVALID_FIELD_VALUE,
        REASON_INVALID_IMPORT_PATTERN,
        REASON_TEMPLATE_RECURSION,
        REASON_AMBIGUOUS_POLICY,
        REASON_CONFLICTING_POLICY,
        REASON_API_BAD_REQUEST,
        REASON_API_AUTH_FAILED,
        REASON_API_NOT_FOUND,
        REASON_API_CONFLICT,
        REASON_API_PRECONDITION_FAILED,
        REASON_API_RATE_LIMITED,
        REASON_API_INTERNAL_ERROR,
        REASON_GATEWAY_ERROR,
        REASON_API_UNEXPECTED_STATUS,
        REASON_API_CONNECTION_FAILED,
        REASON_API_DECODE_FAILED,
        REASON_API_INVALID_URL,
        REASON_API_RETRIES_EXHAUSTED,
    ];

    #[test]
    fn test_reasons_are_unique() {
        let unique: HashSet<&str> = ALL_REASONS.iter().copied().collect();
        assert_eq!(unique.len(), ALL_REASONS.len());
    }

    #[test]
    fn test_reasons_are_camel_case() {
        for reason in ALL_REASONS {
            assert!(
                reason.chars().next().is_some_and(char::is_uppercase),
                "{reason} should start with an uppercase letter"
            );
            assert!(
                reason.chars().all(char::is_alphanumeric),
                "{reason} should contain only letters and digits"
            );
        }
    }

    #[test]
    fn test_stable_values() {
        assert_eq!(REASON_RECORD_SET_NOT_FOUND, "RecordSetNotFound");
        assert_eq!(REASON_CHANGE_TIMEOUT, "ChangeTimeout");
        assert_eq!(REASON_API_NOT_FOUND, "ApiNotFound");
        assert_eq!(REASON_GATEWAY_ERROR, "GatewayError");
        assert_eq!(REASON_API_RETRIES_EXHAUSTED, "ApiRetriesExhausted");
    }
}
