//! Upstream data client
//!
//! Fetches the production and failure exports. Both endpoints answer with
//! an `{success, data}` envelope; anything else is treated as a fetch
//! failure. When the primary URL answers with a non-success status the
//! configured fallback URL is tried once.

use explorer_common::config::DashConfig;
use explorer_common::model::{ApiEnvelope, FailureRecord, ProductionRecord};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("explorer-dash/", env!("CARGO_PKG_VERSION"));
const FETCH_TIMEOUT_SECS: u64 = 30;

/// Upstream fetch errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Upstream rejected request: {0}")]
    Rejected(String),
}

/// Client for the production and failure endpoints
pub struct UpstreamClient {
    http_client: reqwest::Client,
    production_url: String,
    production_fallback: Option<String>,
    failures_url: String,
    failures_fallback: Option<String>,
}

impl UpstreamClient {
    pub fn new(config: &DashConfig) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|e| FetchError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            production_url: config.production_url.clone(),
            production_fallback: config.production_fallback_url.clone(),
            failures_url: config.failures_url.clone(),
            failures_fallback: config.failures_fallback_url.clone(),
        })
    }

    /// Fetch all production records
    pub async fn fetch_production(&self) -> Result<Vec<ProductionRecord>, FetchError> {
        let records = self
            .fetch_dataset(&self.production_url, self.production_fallback.as_deref())
            .await?;
        tracing::info!(count = records.len(), "Fetched production records");
        Ok(records)
    }

    /// Fetch all failure records
    pub async fn fetch_failures(&self) -> Result<Vec<FailureRecord>, FetchError> {
        let records = self
            .fetch_dataset(&self.failures_url, self.failures_fallback.as_deref())
            .await?;
        tracing::info!(count = records.len(), "Fetched failure records");
        Ok(records)
    }

    async fn fetch_dataset<T: DeserializeOwned>(
        &self,
        url: &str,
        fallback: Option<&str>,
    ) -> Result<Vec<T>, FetchError> {
        tracing::debug!(url = %url, "Fetching upstream dataset");

        let mut response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            if let Some(fallback_url) = fallback {
                tracing::warn!(
                    status = %response.status(),
                    fallback = %fallback_url,
                    "Primary endpoint failed, trying fallback"
                );
                response = self
                    .http_client
                    .get(fallback_url)
                    .send()
                    .await
                    .map_err(|e| FetchError::NetworkError(e.to_string()))?;
            }
        }

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(FetchError::ApiError(status.as_u16(), error_text));
        }

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| FetchError::ParseError(e.to_string()))?;

        if !envelope.success {
            return Err(FetchError::Rejected("success flag not set".to_string()));
        }
        envelope
            .data
            .ok_or_else(|| FetchError::Rejected("data array missing".to_string()))
    }
}
