use crate::{consts, models::relay::RelayPayload};
use anyhow::Context;
use async_trait::async_trait;
use std::time::Duration;

/// Posts relay payloads to subscriber URLs over HTTP
#[derive(Clone)]
pub struct RelayHandler {
    pub client: reqwest::Client,
}

impl RelayHandler {
    /// Creates a handler whose requests are bounded by `timeout`
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(consts::RELAY_USER_AGENT)
            .build()
            .context("failed to build relay http client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl crate::services::RelayService for RelayHandler {
    async fn post_payload(&self, url: &str, payload: &RelayPayload) -> anyhow::Result<()> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .with_context(|| format!("Failed to send relay request to {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());

            anyhow::bail!("Subscriber returned error status {}: {}", status, body);
        }

        Ok(())
    }
}
