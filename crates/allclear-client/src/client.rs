//! HTTP client for `POST /facilities/search`.
//!
//! Wraps `reqwest` with backend-specific error handling and typed response
//! deserialization. Request bodies get a final normalization pass that strips
//! `"Any"`-valued keys no matter how the payload was assembled.

use std::time::Duration;

use allclear_core::{strip_inactive_keys, AppConfig, FacilityRecord, SearchPayload};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::ClientError;
use crate::retry::{retry_with_backoff, Backoff};
use crate::search::{FacilitySearch, SearchFuture};

const SEARCH_PATH: &str = "facilities/search";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    records: Vec<FacilityRecord>,
}

/// Client for the facility search backend.
///
/// Construct once at startup with [`FacilityClient::from_config`] and share
/// it by `Arc`. Use [`FacilityClient::with_base_url`] to point at a mock
/// server in tests.
pub struct FacilityClient {
    client: Client,
    search_url: Url,
    /// Retry attempts after the first failure. `0` means a failed search is
    /// returned to the caller as-is.
    max_retries: u32,
    backoff_base_ms: u64,
}

impl FacilityClient {
    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if the
    /// configured base URL does not parse.
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Ok(Self::with_base_url(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?
        .with_retry(config.max_retries, config.retry_backoff_base_ms))
    }

    /// Creates a client with a custom base URL and no automatic retries.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            search_url: Self::search_url(base_url)?,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Enables retry with exponential back-off on transient errors.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Resolves `facilities/search` against `base_url`.
    ///
    /// The base URL is normalised to exactly one trailing slash first so that
    /// a base with a path prefix (`https://host/api`) keeps it.
    fn search_url(base_url: &str) -> Result<Url, ClientError> {
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        Url::parse(&normalised)
            .and_then(|base| base.join(SEARCH_PATH))
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            })
    }

    /// Searches for facilities around the payload's origin.
    ///
    /// Returns records in the order the backend ranked them.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx response.
    /// - [`ClientError::Deserialize`] if the body is not a search response.
    pub async fn search(
        &self,
        payload: &SearchPayload,
    ) -> Result<Vec<FacilityRecord>, ClientError> {
        let mut body = payload.to_body();
        if let Some(map) = body.as_object_mut() {
            let stripped = strip_inactive_keys(map);
            if !stripped.is_empty() {
                tracing::warn!(keys = ?stripped, "stripped inactive criteria from search body");
            }
        }

        let origin = payload.origin_position();
        tracing::debug!(
            latitude = origin.latitude,
            longitude = origin.longitude,
            filters = payload.filters().len(),
            "sending facility search"
        );

        let policy = Backoff {
            max_retries: self.max_retries,
            base_ms: self.backoff_base_ms,
        };
        let records = retry_with_backoff(policy, || self.post_search(&body)).await?;

        tracing::info!(count = records.len(), "facility search completed");
        Ok(records)
    }

    async fn post_search(
        &self,
        body: &serde_json::Value,
    ) -> Result<Vec<FacilityRecord>, ClientError> {
        let response = self
            .client
            .post(self.search_url.clone())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.search_url.to_string(),
            });
        }

        let text = response.text().await?;
        let parsed: SearchResponse =
            serde_json::from_str(&text).map_err(|e| ClientError::Deserialize {
                context: format!("POST {}", self.search_url),
                source: e,
            })?;
        Ok(parsed.records)
    }
}

impl FacilitySearch for FacilityClient {
    fn search<'a>(&'a self, payload: &'a SearchPayload) -> SearchFuture<'a, Vec<FacilityRecord>> {
        Box::pin(FacilityClient::search(self, payload))
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
