// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! REST client for the Cloud DNS v1 and Compute v1 APIs.
//!
//! Every request carries `alt=json`, a User-Agent, `Content-Type: application/json`,
//! a bearer token when one is configured, and `X-Goog-User-Project` when user
//! project override is enabled. Transient failures are retried with exponential
//! backoff (see [`crate::reconcilers::retry`]).

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client as HttpClient, Method};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info};
use url::Url;

use crate::api::types::ResourceRecordSetsListResponse;
use crate::api::{
    Change, ComputeApi, DnsApi, ManagedZone, Network, RecordSetFilter, ResourceRecordSet,
};
use crate::constants::USER_PROJECT_HEADER;
use crate::dns_errors::{ApiError, DnsError};
use crate::http_errors::{map_connection_error, map_http_error_to_reason, status_class};
use crate::metrics::record_api_request;
use crate::provider::ProviderConfig;
use crate::reconcilers::retry::{http_backoff, retry_api_call};

/// Error envelope returned by Google APIs.
#[derive(Deserialize)]
struct GoogleErrorBody {
    error: GoogleErrorDetail,
}

#[derive(Deserialize)]
struct GoogleErrorDetail {
    #[serde(default)]
    message: String,
}

/// Cloud DNS and Compute REST client.
#[derive(Clone, Debug)]
pub struct CloudDnsClient {
    http: HttpClient,
    dns_base: Url,
    compute_base: Url,
    config: ProviderConfig,
    user_agent: String,
}

impl CloudDnsClient {
    /// Build a client from a provider configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DnsError::Validation`] if the configuration is invalid and
    /// [`DnsError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self, DnsError> {
        config.validate()?;
        let timeout = config.request_timeout()?;

        let parse = |base: &str| {
            Url::parse(base).map_err(|e| ApiError::InvalidUrl {
                url: base.to_string(),
                reason: e.to_string(),
            })
        };
        let dns_base = parse(&config.dns_base_path)?;
        let compute_base = parse(&config.compute_base_path)?;

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Connection {
                url: config.dns_base_path.clone(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            dns_base,
            compute_base,
            user_agent: config.user_agent(),
            config: config.clone(),
        })
    }

    /// Join escaped path segments onto a base path.
    fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl {
                url: base.to_string(),
                reason: "base path cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn dns_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        Self::endpoint(&self.dns_base, segments)
    }

    fn compute_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        Self::endpoint(&self.compute_base, segments)
    }

    /// Send a request with retry and decode the JSON response.
    ///
    /// Returns `None` for `204 No Content`.
    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        mut url: Url,
        project: &str,
        body: Option<&str>,
        operation: &str,
    ) -> Result<Option<T>, ApiError> {
        url.query_pairs_mut().append_pair("alt", "json");

        let text = retry_api_call(
            http_backoff(),
            || self.send_once(method.clone(), url.clone(), project, body),
            operation,
        )
        .await?;

        match text {
            None => Ok(None),
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| ApiError::Decode {
                    url: url.to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    /// Like [`Self::call`], but an empty response is an error.
    async fn call_expecting_body<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        project: &str,
        body: Option<&str>,
        operation: &str,
    ) -> Result<T, ApiError> {
        let url_str = url.to_string();
        self.call(method, url, project, body, operation)
            .await?
            .ok_or_else(|| ApiError::Decode {
                url: url_str,
                reason: "empty response body".to_string(),
            })
    }

    /// Perform a single HTTP exchange.
    async fn send_once(
        &self,
        method: Method,
        url: Url,
        project: &str,
        body: Option<&str>,
    ) -> Result<Option<String>, ApiError> {
        debug!(
            method = %method,
            url = %url,
            body = ?body,
            auth_enabled = self.config.access_token.is_some(),
            "Google API request"
        );

        let url_str = url.to_string();
        let mut request = self
            .http
            .request(method.clone(), url)
            .header(USER_AGENT, &self.user_agent)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token);
        }
        if let Some(user_project) = self.config.user_project_header(project) {
            request = request.header(USER_PROJECT_HEADER, user_project);
        }
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                record_api_request(method.as_str(), "error");
                let (reason, message) = map_connection_error();
                error!(
                    method = %method,
                    url = %url_str,
                    reason = reason,
                    error = %e,
                    "{message}"
                );
                return Err(ApiError::Connection {
                    url: url_str,
                    reason: e.to_string(),
                });
            }
        };

        let status = response.status();
        record_api_request(method.as_str(), status_class(status.as_u16()));

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<GoogleErrorBody>(&error_text)
                .map(|b| b.error.message)
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or(error_text);
            let (reason, _) = map_http_error_to_reason(status.as_u16());
            debug!(
                method = %method,
                url = %url_str,
                status = %status,
                reason = reason,
                error = %message,
                "Google API request failed"
            );
            return Err(ApiError::Http {
                status: status.as_u16(),
                url: url_str,
                message,
            });
        }

        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let text = response.text().await.map_err(|e| ApiError::Decode {
            url: url_str.clone(),
            reason: format!("failed to read response body: {e}"),
        })?;

        debug!(
            method = %method,
            url = %url_str,
            status = %status,
            response_len = text.len(),
            "Google API request successful"
        );

        Ok(Some(text))
    }
}

#[async_trait]
impl DnsApi for CloudDnsClient {
    async fn list_record_sets(
        &self,
        project: &str,
        managed_zone: &str,
        filter: &RecordSetFilter,
    ) -> Result<Vec<ResourceRecordSet>, ApiError> {
        let mut rrsets = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url =
                self.dns_url(&["projects", project, "managedZones", managed_zone, "rrsets"])?;
            {
                let mut query = url.query_pairs_mut();
                if let Some(name) = &filter.name {
                    query.append_pair("name", name);
                }
                if let Some(record_type) = &filter.record_type {
                    query.append_pair("type", record_type);
                }
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let page: ResourceRecordSetsListResponse = self
                .call_expecting_body(Method::GET, url, project, None, "list record sets")
                .await?;
            rrsets.extend(page.rrsets);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(
            project = %project,
            managed_zone = %managed_zone,
            count = rrsets.len(),
            "Listed record sets"
        );
        Ok(rrsets)
    }

    async fn create_change(
        &self,
        project: &str,
        managed_zone: &str,
        change: &Change,
    ) -> Result<Change, ApiError> {
        let url = self.dns_url(&["projects", project, "managedZones", managed_zone, "changes"])?;
        let body = serde_json::to_string(change).map_err(|e| ApiError::Decode {
            url: url.to_string(),
            reason: format!("failed to encode change: {e}"),
        })?;

        let created: Change = self
            .call_expecting_body(Method::POST, url, project, Some(&body), "create change")
            .await?;

        info!(
            project = %project,
            managed_zone = %managed_zone,
            change_id = created.id.as_deref().unwrap_or_default(),
            additions = change.additions.len(),
            deletions = change.deletions.len(),
            "Submitted DNS change"
        );
        Ok(created)
    }

    async fn get_change(
        &self,
        project: &str,
        managed_zone: &str,
        change_id: &str,
    ) -> Result<Change, ApiError> {
        let url = self.dns_url(&[
            "projects",
            project,
            "managedZones",
            managed_zone,
            "changes",
            change_id,
        ])?;
        self.call_expecting_body(Method::GET, url, project, None, "get change")
            .await
    }

    async fn get_managed_zone(
        &self,
        project: &str,
        managed_zone: &str,
    ) -> Result<ManagedZone, ApiError> {
        let url = self.dns_url(&["projects", project, "managedZones", managed_zone])?;
        self.call_expecting_body(Method::GET, url, project, None, "get managed zone")
            .await
    }
}

#[async_trait]
impl ComputeApi for CloudDnsClient {
    async fn get_network(&self, project: &str, network: &str) -> Result<Network, ApiError> {
        let url = self.compute_url(&["projects", project, "global", "networks", network])?;
        self.call_expecting_body(Method::GET, url, project, None, "get network")
            .await
    }
}
