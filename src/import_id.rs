// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Import identifier parsing.
//!
//! An import id is a free-form string matched against an ordered list of regular
//! expressions with named capture groups. Formats are tried strictly in order and the
//! first one that matches the whole id wins, e.g.:
//!
//! - `projects/(?P<project>[^/]+)/managedZones/(?P<managed_zone>[^/]+)/rrsets/(?P<name>[^/]+)/(?P<type>[^/]+)` (applied first)
//! - `(?P<project>[^/]+)/(?P<managed_zone>[^/]+)/(?P<name>[^/]+)/(?P<type>[^/]+)`
//! - `(?P<managed_zone>[^/]+)/(?P<name>[^/]+)/(?P<type>[^/]+)` (applied last)
//!
//! Captured values are coerced according to a caller-supplied [`FieldKind`] map.

use std::collections::HashMap;

use regex::Regex;
use tracing::debug;

use crate::dns_errors::ImportIdError;
use crate::model::RecordSetKey;

/// Accepted record-set import formats, highest priority first.
pub const RECORD_SET_IMPORT_FORMATS: [&str; 3] = [
    "projects/(?P<project>[^/]+)/managedZones/(?P<managed_zone>[^/]+)/rrsets/(?P<name>[^/]+)/(?P<type>[^/]+)",
    "(?P<project>[^/]+)/(?P<managed_zone>[^/]+)/(?P<name>[^/]+)/(?P<type>[^/]+)",
    "(?P<managed_zone>[^/]+)/(?P<name>[^/]+)/(?P<type>[^/]+)",
];

/// Kind of value a captured field is coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Passed through verbatim
    String,
    /// Parsed as a signed 64-bit integer
    Integer,
}

/// A coerced import field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A string field
    String(String),
    /// An integer field
    Integer(i64),
}

impl FieldValue {
    /// Borrow the value as a string, if it is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Integer(_) => None,
        }
    }

    /// Return the value as an integer, if it is one.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::String(_) => None,
        }
    }
}

/// Coerce a single captured value according to its kind.
fn coerce(field: &str, value: &str, kind: FieldKind) -> Result<FieldValue, ImportIdError> {
    match kind {
        FieldKind::String => Ok(FieldValue::String(value.to_string())),
        FieldKind::Integer => value.parse::<i64>().map(FieldValue::Integer).map_err(|e| {
            ImportIdError::InvalidFieldValue {
                field: field.to_string(),
                value: value.to_string(),
                reason: e.to_string(),
            }
        }),
    }
}

/// Parse an import id, extracting field values using the given list of formats.
///
/// Each format must match the entire id. Named capture groups whose names are not in
/// `field_kinds` are ignored.
///
/// # Errors
///
/// - [`ImportIdError::InvalidPattern`] if a format is not a valid regular expression
/// - [`ImportIdError::InvalidFieldValue`] if an integer field is not numeric
/// - [`ImportIdError::NoMatch`] if no format matches
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use gcdns::import_id::{parse_import_id, FieldKind, FieldValue};
///
/// let kinds = HashMap::from([("zone", FieldKind::String), ("id", FieldKind::Integer)]);
/// let fields = parse_import_id(&["(?P<zone>[^/]+)/(?P<id>[^/]+)"], "prod/42", &kinds).unwrap();
/// assert_eq!(fields["zone"], FieldValue::String("prod".into()));
/// assert_eq!(fields["id"], FieldValue::Integer(42));
/// ```
pub fn parse_import_id<S: AsRef<str>>(
    formats: &[S],
    id: &str,
    field_kinds: &HashMap<&str, FieldKind>,
) -> Result<HashMap<String, FieldValue>, ImportIdError> {
    for format in formats {
        let format = format.as_ref();
        let re = Regex::new(&format!("^(?:{format})$")).map_err(|e| {
            ImportIdError::InvalidPattern {
                pattern: format.to_string(),
                reason: e.to_string(),
            }
        })?;

        let Some(captures) = re.captures(id) else {
            continue;
        };

        debug!(id = %id, format = %format, "Matched import id to format");

        let mut values = HashMap::new();
        for name in re.capture_names().flatten() {
            let (Some(kind), Some(m)) = (field_kinds.get(name), captures.name(name)) else {
                continue;
            };
            debug!(field = %name, value = %m.as_str(), "Importing field");
            values.insert(name.to_string(), coerce(name, m.as_str(), *kind)?);
        }
        return Ok(values);
    }

    Err(ImportIdError::NoMatch {
        id: id.to_string(),
        formats: formats.iter().map(|f| f.as_ref().to_string()).collect(),
    })
}

/// Field kinds of the record-set identity.
#[must_use]
pub fn record_set_field_kinds() -> HashMap<&'static str, FieldKind> {
    HashMap::from([
        ("project", FieldKind::String),
        ("managed_zone", FieldKind::String),
        ("name", FieldKind::String),
        ("type", FieldKind::String),
    ])
}

/// Parse a record-set import id into its identity key.
///
/// Formats without a project segment take `default_project`.
///
/// # Errors
///
/// Returns [`ImportIdError`] if the id matches no format, or matches a format that
/// does not carry a project while no default project is configured.
pub fn parse_record_set_import_id(
    id: &str,
    default_project: Option<&str>,
) -> Result<RecordSetKey, ImportIdError> {
    let fields = parse_import_id(&RECORD_SET_IMPORT_FORMATS, id, &record_set_field_kinds())?;

    let field = |name: &str| -> Option<String> {
        fields
            .get(name)
            .and_then(FieldValue::as_str)
            .map(str::to_string)
    };
    let required = |name: &str| -> Result<String, ImportIdError> {
        field(name).ok_or_else(|| ImportIdError::MissingField {
            id: id.to_string(),
            field: name.to_string(),
        })
    };

    let project = match field("project") {
        Some(project) => project,
        None => default_project
            .map(str::to_string)
            .ok_or_else(|| ImportIdError::MissingField {
                id: id.to_string(),
                field: "project".to_string(),
            })?,
    };

    Ok(RecordSetKey {
        project,
        managed_zone: required("managed_zone")?,
        name: required("name")?,
        record_type: required("type")?,
    })
}
