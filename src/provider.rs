// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Provider configuration.
//!
//! [`ProviderConfig`] holds everything needed to talk to the Cloud DNS and Compute
//! APIs. It is loaded from an optional YAML file, then overridden from the
//! environment, then validated before any client is built.
//!
//! # Environment Variables
//!
//! | Variable | Field |
//! |----------|-------|
//! | `GOOGLE_PROJECT` | `project` |
//! | `GOOGLE_CREDENTIALS` | `credentials` |
//! | `GOOGLE_OAUTH_ACCESS_TOKEN` | `access_token` |
//! | `GOOGLE_DNS_CUSTOM_ENDPOINT` | `dns_base_path` |
//! | `GOOGLE_COMPUTE_CUSTOM_ENDPOINT` | `compute_base_path` |
//! | `GOOGLE_BILLING_PROJECT` | `billing_project` |

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::constants::{
    DEFAULT_COMPUTE_BASE_PATH, DEFAULT_DNS_BASE_PATH, DEFAULT_REQUEST_TIMEOUT, ENV_ACCESS_TOKEN,
    ENV_BILLING_PROJECT, ENV_COMPUTE_CUSTOM_ENDPOINT, ENV_CREDENTIALS, ENV_DNS_CUSTOM_ENDPOINT,
    ENV_PROJECT, NO_BILLING_PROJECT_OVERRIDE, USER_AGENT_PRODUCT,
};
use crate::dns_errors::ValidationError;
use crate::validation::{validate_credentials, validate_non_negative_duration};

/// A zero request timeout means "effectively unbounded".
const UNBOUNDED_REQUEST_TIMEOUT_SECS: u64 = 3600;

/// Connection settings for the Google APIs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Default project for resources that do not name one
    pub project: Option<String>,
    /// Path to, or contents of, a JSON credentials file. Validated, but requests
    /// authenticate with `access_token`, which must be set alongside it.
    pub credentials: Option<String>,
    /// OAuth2 access token sent as a bearer token
    pub access_token: Option<String>,
    /// Cloud DNS base path, ending with `/`
    pub dns_base_path: String,
    /// Compute base path, ending with `/`
    pub compute_base_path: String,
    /// Go-style request timeout, e.g. `120s`
    pub request_timeout: String,
    /// Bill requests to the resource (or billing) project instead of the credentials' project
    pub user_project_override: bool,
    /// Project billed when `user_project_override` is set
    pub billing_project: Option<String>,
    /// Module name appended to the User-Agent
    pub module_name: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            project: None,
            credentials: None,
            access_token: None,
            dns_base_path: DEFAULT_DNS_BASE_PATH.to_string(),
            compute_base_path: DEFAULT_COMPUTE_BASE_PATH.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT.to_string(),
            user_project_override: false,
            billing_project: None,
            module_name: None,
        }
    }
}

impl ProviderConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read provider config {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse provider config {}", path.display()))
    }

    /// Override unset or defaulted fields from an environment lookup.
    ///
    /// Values already set in the file take precedence over the environment, except
    /// the base paths, which are only overridden while they hold their defaults.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if self.project.is_none() {
            self.project = non_empty(ENV_PROJECT);
        }
        if self.credentials.is_none() {
            self.credentials = non_empty(ENV_CREDENTIALS);
        }
        if self.access_token.is_none() {
            self.access_token = non_empty(ENV_ACCESS_TOKEN);
        }
        if self.billing_project.is_none() {
            self.billing_project = non_empty(ENV_BILLING_PROJECT);
        }
        if self.dns_base_path == DEFAULT_DNS_BASE_PATH {
            if let Some(endpoint) = non_empty(ENV_DNS_CUSTOM_ENDPOINT) {
                debug!(endpoint = %endpoint, "Using custom Cloud DNS endpoint");
                self.dns_base_path = endpoint;
            }
        }
        if self.compute_base_path == DEFAULT_COMPUTE_BASE_PATH {
            if let Some(endpoint) = non_empty(ENV_COMPUTE_CUSTOM_ENDPOINT) {
                debug!(endpoint = %endpoint, "Using custom Compute endpoint");
                self.compute_base_path = endpoint;
            }
        }
    }

    /// Override fields from the process environment.
    pub fn apply_process_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for invalid credentials, credentials without an
    /// access token, an invalid or negative request timeout, or a base path that is
    /// not an absolute URL ending in `/`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(credentials) = self.credentials.as_deref().filter(|c| !c.is_empty()) {
            validate_credentials(credentials)?;
            // Requests authenticate with the bearer token only.
            if self.access_token.as_deref().is_none_or(str::is_empty) {
                return Err(ValidationError::InvalidConfig {
                    field: "credentials".to_string(),
                    reason: format!(
                        "credentials are not exchanged for tokens; set access_token or \
                         {ENV_ACCESS_TOKEN} (for example from `gcloud auth print-access-token`)"
                    ),
                });
            }
        }
        validate_non_negative_duration(&self.request_timeout)?;
        validate_base_path("dns_base_path", &self.dns_base_path)?;
        validate_base_path("compute_base_path", &self.compute_base_path)?;
        Ok(())
    }

    /// The request timeout. Zero means one hour.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `request_timeout` is invalid.
    pub fn request_timeout(&self) -> Result<Duration, ValidationError> {
        let timeout = validate_non_negative_duration(&self.request_timeout)?;
        if timeout.is_zero() {
            return Ok(Duration::from_secs(UNBOUNDED_REQUEST_TIMEOUT_SECS));
        }
        Ok(timeout)
    }

    /// User-Agent sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> String {
        let base = format!("{USER_AGENT_PRODUCT}/{}", env!("CARGO_PKG_VERSION"));
        match self.module_name.as_deref().filter(|m| !m.is_empty()) {
            Some(module) => format!("{base} {module}"),
            None => base,
        }
    }

    /// Value of the `X-Goog-User-Project` header for a request against `project`.
    ///
    /// Only set when `user_project_override` is enabled. The billing project wins
    /// over the resource project, and the `NO_BILLING_PROJECT_OVERRIDE` sentinel
    /// yields an empty header.
    #[must_use]
    pub fn user_project_header(&self, project: &str) -> Option<String> {
        if !self.user_project_override {
            return None;
        }
        let billed = self.billing_project.as_deref().unwrap_or(project);
        if billed.is_empty() {
            return None;
        }
        if billed == NO_BILLING_PROJECT_OVERRIDE {
            return Some(String::new());
        }
        Some(billed.to_string())
    }
}

fn validate_base_path(field: &str, value: &str) -> Result<(), ValidationError> {
    let url = Url::parse(value).map_err(|e| ValidationError::InvalidConfig {
        field: field.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() || !value.ends_with('/') {
        return Err(ValidationError::InvalidConfig {
            field: field.to_string(),
            reason: format!("{value} must be an absolute URL ending with '/'"),
        });
    }
    Ok(())
}
