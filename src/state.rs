// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Local record of the last applied state of one record set.
//!
//! The state file is YAML. It stores the canonical identifier and the record set as
//! last read back from the API, in the same shape users write configurations in.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::STATE_FILE_VERSION;
use crate::dns_errors::DnsError;
use crate::model::{RecordSet, RecordSetConfig};

/// Contents of a state file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateFile {
    /// Format version
    pub version: u32,
    /// Canonical record-set identifier
    pub id: String,
    /// Record set as last read back
    pub record_set: RecordSetConfig,
    /// When the state was written
    pub updated_at: DateTime<Utc>,
}

impl StateFile {
    /// Capture `record_set` as the current state.
    #[must_use]
    pub fn new(record_set: &RecordSet) -> Self {
        Self {
            version: STATE_FILE_VERSION,
            id: record_set.key.id(),
            record_set: RecordSetConfig::from(record_set),
            updated_at: Utc::now(),
        }
    }

    /// The stored record set.
    ///
    /// # Errors
    ///
    /// Returns [`DnsError`] if the stored record set is no longer valid.
    pub fn record_set(&self) -> Result<RecordSet, DnsError> {
        self.record_set.resolve(None)
    }

    /// Load a state file. A missing file yields `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or was
    /// written by a newer version.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            debug!(path = %path.display(), "No state file");
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file {}", path.display()))?;
        let state: Self = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse state file {}", path.display()))?;
        if state.version > STATE_FILE_VERSION {
            bail!(
                "State file {} has version {}, newest supported is {}",
                path.display(),
                state.version,
                STATE_FILE_VERSION
            );
        }
        Ok(Some(state))
    }

    /// Write the state file, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be serialized or written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_yaml::to_string(self).context("Failed to serialize state")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write state file {}", path.display()))?;
        debug!(path = %path.display(), id = %self.id, "Saved state file");
        Ok(())
    }

    /// Remove the state file if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be removed.
    pub fn remove(path: &Path) -> Result<()> {
        if path.exists() {
            std::fs::remove_file(path)
                .with_context(|| format!("Failed to remove state file {}", path.display()))?;
            debug!(path = %path.display(), "Removed state file");
        }
        Ok(())
    }
}
