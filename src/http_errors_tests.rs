// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for http_errors module
//!
//! These tests verify HTTP error code mapping to diagnostic reasons.

#[cfg(test)]
mod tests {
    use crate::http_errors::*;
    use crate::status_reasons::*;

    // ============================================================================
    // Test HTTP 4xx Error Code Mappings
    // ============================================================================

    #[test]
    fn test_map_http_400_bad_request() {
        let (reason, message) = map_http_error_to_reason(400);
        assert_eq!(reason, REASON_API_BAD_REQUEST);
        assert!(message.contains("400"));
        assert!(message.contains("Invalid request"));
    }

    #[test]
    fn test_map_http_401_and_403_are_auth_failures() {
        let (reason_401, message_401) = map_http_error_to_reason(401);
        let (reason_403, message_403) = map_http_error_to_reason(403);
        assert_eq!(reason_401, REASON_API_AUTH_FAILED);
        assert_eq!(reason_403, REASON_API_AUTH_FAILED);
        assert!(message_401.contains("authentication"));
        assert!(message_403.contains("authorization"));
    }

    #[test]
    fn test_map_http_404_not_found() {
        let (reason, message) = map_http_error_to_reason(404);
        assert_eq!(reason, REASON_API_NOT_FOUND);
        assert!(message.contains("not found"));
    }

    #[test]
    fn test_map_http_409_conflict() {
        let (reason, message) = map_http_error_to_reason(409);
        assert_eq!(reason, REASON_API_CONFLICT);
        assert!(message.contains("already exists"));
    }

    #[test]
    fn test_map_http_429_rate_limited() {
        let (reason, _) = map_http_error_to_reason(429);
        assert_eq!(reason, REASON_API_RATE_LIMITED);
    }

    // ============================================================================
    // Test HTTP 5xx Error Code Mappings
    // ============================================================================

    #[test]
    fn test_map_http_500_internal_server_error() {
        let (reason, message) = map_http_error_to_reason(500);
        assert_eq!(reason, REASON_API_INTERNAL_ERROR);
        assert!(message.contains("internal error"));
    }

    #[test]
    fn test_map_gateway_errors() {
        for code in [502, 503, 504] {
            let (reason, message) = map_http_error_to_reason(code);
            assert_eq!(reason, REASON_GATEWAY_ERROR, "code {code}");
            assert!(message.contains(&code.to_string()));
        }
    }

    #[test]
    fn test_map_unknown_status() {
        let (reason, message) = map_http_error_to_reason(418);
        assert_eq!(reason, REASON_API_UNEXPECTED_STATUS);
        assert!(message.contains("418"));
    }

    // ============================================================================
    // Test Connection Errors and Status Classes
    // ============================================================================

    #[test]
    fn test_map_connection_error() {
        let (reason, message) = map_connection_error();
        assert_eq!(reason, REASON_API_CONNECTION_FAILED);
        assert!(message.contains("Cannot connect"));
    }

    #[test]
    fn test_status_class() {
        assert_eq!(status_class(200), "2xx");
        assert_eq!(status_class(204), "2xx");
        assert_eq!(status_class(404), "4xx");
        assert_eq!(status_class(503), "5xx");
        assert_eq!(status_class(101), "other");
    }
}
