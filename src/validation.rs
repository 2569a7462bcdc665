// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Input validators.
//!
//! Every validator is a pure function that either accepts its input or returns a
//! [`ValidationError`] describing why it was rejected. Validators run before any
//! remote call is made.

use std::path::Path;
use std::time::Duration;

use crate::dns_errors::ValidationError;

const NANOS_PER_MICRO: f64 = 1_000.0;
const NANOS_PER_MILLI: f64 = 1_000_000.0;
const NANOS_PER_SECOND: f64 = 1_000_000_000.0;
const NANOS_PER_MINUTE: f64 = 60.0 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: f64 = 60.0 * NANOS_PER_MINUTE;

/// Reject record names that are empty or lack the trailing dot of a fully-qualified name.
///
/// ```
/// use gcdns::validation::validate_trailing_dot;
///
/// assert!(validate_trailing_dot("name", "www.example.com.").is_ok());
/// assert!(validate_trailing_dot("name", "www.example.com").is_err());
/// ```
///
/// # Errors
///
/// Returns [`ValidationError::EmptyName`] or [`ValidationError::MissingTrailingDot`].
pub fn validate_trailing_dot(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyName {
            field: field.to_string(),
        });
    }
    if !value.ends_with('.') {
        return Err(ValidationError::MissingTrailingDot {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Validate a credentials value.
///
/// Empty is accepted (ambient credentials are used), as is a path to an existing file.
/// Anything else must be a JSON object carrying a string `type` field, as found in
/// service-account and authorized-user key files.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidCredentials`] if the value is neither.
pub fn validate_credentials(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || Path::new(value).exists() {
        return Ok(());
    }

    let json: serde_json::Value =
        serde_json::from_str(value).map_err(|e| ValidationError::InvalidCredentials {
            reason: e.to_string(),
        })?;

    match json.get("type") {
        Some(serde_json::Value::String(_)) => Ok(()),
        Some(_) => Err(ValidationError::InvalidCredentials {
            reason: "\"type\" must be a string".to_string(),
        }),
        None => Err(ValidationError::InvalidCredentials {
            reason: "missing \"type\" field".to_string(),
        }),
    }
}

/// Reject a string that is not one of `allowed`.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidEnumValue`] listing the accepted values.
pub fn validate_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ValidationError::InvalidEnumValue {
        field: field.to_string(),
        value: value.to_string(),
        allowed: allowed.iter().map(|s| (*s).to_string()).collect(),
    })
}

/// Reject a negative TTL.
///
/// # Errors
///
/// Returns [`ValidationError::NegativeTtl`].
pub fn validate_ttl(ttl: i64) -> Result<(), ValidationError> {
    if ttl < 0 {
        return Err(ValidationError::NegativeTtl { ttl });
    }
    Ok(())
}

/// Parse a Go-style duration string into signed nanoseconds.
///
/// A duration is an optional sign followed by one or more decimal numbers, each with
/// an optional fraction and a mandatory unit. Valid units are `ns`, `us` (or `µs`),
/// `ms`, `s`, `m` and `h`. The bare string `0` is also accepted.
///
/// # Examples
///
/// ```
/// use gcdns::validation::parse_go_duration;
///
/// assert_eq!(parse_go_duration("300ms").unwrap(), 300_000_000);
/// assert_eq!(parse_go_duration("1.5h").unwrap(), 5_400_000_000_000);
/// assert_eq!(parse_go_duration("2h45m").unwrap(), 9_900_000_000_000);
/// assert_eq!(parse_go_duration("-1s").unwrap(), -1_000_000_000);
/// assert!(parse_go_duration("10").is_err());  // Missing unit
/// assert!(parse_go_duration("10x").is_err()); // Invalid unit
/// ```
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDuration`] if the string is empty, a number has
/// no unit, a unit is unknown, or the value overflows.
pub fn parse_go_duration(duration_str: &str) -> Result<i128, ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidDuration {
        value: duration_str.to_string(),
        reason: reason.to_string(),
    };

    let (negative, mut rest) = match duration_str.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, duration_str.strip_prefix('+').unwrap_or(duration_str)),
    };

    if rest == "0" {
        return Ok(0);
    }
    if rest.is_empty() {
        return Err(invalid("duration string cannot be empty"));
    }

    let mut total_nanos: f64 = 0.0;
    while !rest.is_empty() {
        // Number with optional fraction
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_end);
        if number.is_empty() || number == "." || number.matches('.').count() > 1 {
            return Err(invalid("expected a decimal number"));
        }
        let value: f64 = number
            .parse()
            .map_err(|_| invalid("expected a decimal number"))?;

        // Unit runs until the next digit or dot
        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_end);
        let scale = match unit {
            "ns" => 1.0,
            "us" | "µs" | "μs" => NANOS_PER_MICRO,
            "ms" => NANOS_PER_MILLI,
            "s" => NANOS_PER_SECOND,
            "m" => NANOS_PER_MINUTE,
            "h" => NANOS_PER_HOUR,
            "" => return Err(invalid("missing unit")),
            _ => return Err(invalid(&format!("unknown unit '{unit}'"))),
        };

        total_nanos += value * scale;
        if !total_nanos.is_finite() || total_nanos > i64::MAX as f64 {
            return Err(invalid("duration value too large (overflow)"));
        }
        rest = next;
    }

    #[allow(clippy::cast_possible_truncation)]
    let nanos = total_nanos.round() as i128;
    Ok(if negative { -nanos } else { nanos })
}

/// Validate a non-negative Go-style duration and convert it.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDuration`] for unparsable input and
/// [`ValidationError::NegativeDuration`] for negative values.
pub fn validate_non_negative_duration(duration_str: &str) -> Result<Duration, ValidationError> {
    let nanos = parse_go_duration(duration_str)?;
    if nanos < 0 {
        return Err(ValidationError::NegativeDuration {
            value: duration_str.to_string(),
        });
    }
    let nanos = u64::try_from(nanos).map_err(|_| ValidationError::InvalidDuration {
        value: duration_str.to_string(),
        reason: "duration value too large (overflow)".to_string(),
    })?;
    Ok(Duration::from_nanos(nanos))
}
