pub mod relay;

use crate::models::{credential::Credential, relay::RelayPayload};
use async_trait::async_trait;

/// Outbound side of the WhatsApp Business API.
///
/// Responses are returned as the raw JSON the API answered with.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagingService {
    async fn send_text(
        &self,
        sender: &Credential,
        recipient: &str,
        message: &str,
    ) -> anyhow::Result<serde_json::Value>;

    async fn send_template(
        &self,
        sender: &Credential,
        recipient: &str,
        template: &str,
        components: &[serde_json::Value],
        lang: &str,
    ) -> anyhow::Result<serde_json::Value>;
}

/// Delivers relay payloads to one subscriber URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelayService {
    /// POSTs `payload` as JSON to `url`. Non-2xx answers are errors.
    async fn post_payload(&self, url: &str, payload: &RelayPayload) -> anyhow::Result<()>;
}

pub type ImplMessagingService = Box<dyn MessagingService>;
pub type ImplRelayService = Box<dyn RelayService>;
