//! Implements the `Source` trait with an HTTP GET against a configured endpoint.

use crate::model::Snapshot;
use crate::source::Source;
use crate::Result;
use anyhow::{bail, Context};
use std::time::Duration;
use tracing::trace;
use url::Url;

const TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches the dataset document from `endpoint`.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    endpoint: Url,
    client: reqwest::Client,
}

impl RemoteSource {
    pub fn new(endpoint: Url) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(TIMEOUT)
            .build()
            .context("Unable to create the HTTP client")?;
        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl Source for RemoteSource {
    async fn fetch(&self) -> Result<Snapshot> {
        trace!("GET {}", self.endpoint);
        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", self.endpoint))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            bail!("GET {} failed with status {}: {}", self.endpoint, status, body);
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read the response from {}", self.endpoint))?;
        serde_json::from_str(&body)
            .with_context(|| format!("The response from {} is not a valid dataset", self.endpoint))
    }
}
