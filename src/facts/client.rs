//! HTTP client for the fact provider.

use crate::config::FactsConfig;
use crate::facts::types::{FactError, FactPayload, FactResult};

/// Thin wrapper around a shared `reqwest::Client` bound to one endpoint.
#[derive(Clone, Debug)]
pub struct FactClient {
    http: reqwest::Client,
    url: String,
}

impl FactClient {
    /// Create a client for the configured provider.
    pub fn new(config: &FactsConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a client reusing an existing connection pool.
    pub fn with_client(http: reqwest::Client, config: &FactsConfig) -> Self {
        Self {
            http,
            url: config.url.clone(),
        }
    }

    /// Fetch one fact.
    pub async fn fetch(&self) -> FactResult<String> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(FactError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %self.url, status = status.as_u16(), "Fact provider error status");
            return Err(FactError::Status(status.as_u16()));
        }

        let payload: FactPayload = response.json().await.map_err(FactError::Decode)?;
        tracing::debug!(url = %self.url, len = payload.fact.len(), "Fetched fact");
        Ok(payload.fact)
    }
}
