//! HTTP client for the external music metadata service.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use std::time::Duration;
use tracing::debug;

use super::{MetadataProvider, MetadataProviderError, SongDetail};

/// Calls `GET <endpoint>?group=<group>&song=<title>` on the metadata service.
pub struct MetadataProviderClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl MetadataProviderClient {
    /// Create a new metadata client.
    ///
    /// # Arguments
    /// * `endpoint` - Full URL of the song info endpoint (e.g., "http://localhost:8081/info")
    /// * `timeout` - Timeout applied to each lookup, connection included
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("Invalid metadata service URL: {}", endpoint))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            bail!(
                "Metadata service URL must be http or https, got {}",
                endpoint.scheme()
            );
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl MetadataProvider for MetadataProviderClient {
    async fn lookup(&self, group: &str, title: &str) -> Result<SongDetail, MetadataProviderError> {
        debug!("Looking up \"{}\" by \"{}\"", title, group);
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("group", group), ("song", title)])
            .send()
            .await
            .map_err(|e| MetadataProviderError::Request(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(MetadataProviderError::Status(response.status().as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| MetadataProviderError::Request(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| MetadataProviderError::InvalidResponse(e.to_string()))
    }
}
