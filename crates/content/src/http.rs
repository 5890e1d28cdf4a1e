//! HTTP content source: fetches the photo listing from the gallery backend.

use crate::payload::parse_payload;
use anchorwall_core::content::ContentItem;
use anchorwall_core::error::SourceError;
use anchorwall_core::source::ContentSource;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Fetches `GET <endpoint>` and parses `{"photos": [...]}`.
pub struct HttpContentSource {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpContentSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::NotConfigured(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_all(&self) -> Result<Vec<ContentItem>, SourceError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(endpoint = %self.endpoint, status = status.as_u16(), "Content fetch failed");
            return Err(SourceError::Http {
                status_code: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let items = parse_payload(&body)?;
        debug!(endpoint = %self.endpoint, count = items.len(), "Fetched content listing");
        Ok(items)
    }
}
