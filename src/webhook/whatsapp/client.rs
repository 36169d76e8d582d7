//! # WhatsApp API Client
//!
//! Sends text and template messages to the WhatsApp Business API on behalf of
//! any configured credential. The credential picks both the endpoint (its
//! phone number ID) and the bearer token.

use super::outgoing_schemas::{OutgoingTemplateMessage, OutgoingTextMessage};
use crate::{consts, models::credential::Credential};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

/// WhatsApp API client shared by every sender identity
#[derive(Clone)]
pub struct WhatsAppClient {
    /// HTTP client for making API requests
    client: reqwest::Client,
    /// Graph API base URL including version
    graph_api_url: String,
}

impl WhatsAppClient {
    /// Creates a new WhatsApp client against `graph_api_url`, every call bounded by `timeout`
    pub fn new(graph_api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(consts::RELAY_USER_AGENT)
            .build()
            .context("failed to build WhatsApp http client")?;

        Ok(Self {
            client,
            graph_api_url: graph_api_url.into(),
        })
    }

    /// Internal method to send any message type to WhatsApp API
    async fn send_message<T: serde::Serialize + Sync>(
        &self,
        sender: &Credential,
        message: &T,
    ) -> Result<serde_json::Value> {
        let endpoint =
            consts::whatsapp_messages_endpoint(&self.graph_api_url, &sender.phone_number_id);

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&sender.access_token)
            .header("Content-Type", "application/json")
            .json(message)
            .send()
            .await
            .context("Failed to send request to WhatsApp API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());

            anyhow::bail!("WhatsApp API returned error status {}: {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse WhatsApp API response")
    }
}

#[async_trait]
impl crate::services::MessagingService for WhatsAppClient {
    async fn send_text(
        &self,
        sender: &Credential,
        recipient: &str,
        message: &str,
    ) -> Result<serde_json::Value> {
        let message = OutgoingTextMessage::new(recipient.to_string(), message.to_string());
        self.send_message(sender, &message).await
    }

    async fn send_template(
        &self,
        sender: &Credential,
        recipient: &str,
        template: &str,
        components: &[serde_json::Value],
        lang: &str,
    ) -> Result<serde_json::Value> {
        let message = OutgoingTemplateMessage::new(
            recipient.to_string(),
            template.to_string(),
            lang.to_string(),
            components.to_vec(),
        );
        self.send_message(sender, &message).await
    }
}
