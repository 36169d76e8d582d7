//! # Outbound Messages Module
//!
//! Sends text and template messages on behalf of a configured sender.
//! The sender is resolved from the credential table first, so an unknown
//! sender never reaches the WhatsApp API.

use crate::{errors::RelayError, metric, models::credential::CredentialStore, services};
use tracing::{debug, info};

/// Sends a text message from `sender` to `recipient`.
///
/// # Arguments
/// * `store` - Credential table used to resolve `sender`
/// * `messaging` - WhatsApp API client
/// * `sender` - Phone number ID or display number of the sending account
/// * `recipient` - Recipient's WhatsApp ID (phone number)
/// * `message` - Message text
///
/// # Returns
/// The WhatsApp API response, unmodified.
///
/// # Errors
/// * `RelayError::SenderNotFound` - `sender` is not configured
/// * `RelayError::ProviderError` - the WhatsApp API call failed
pub async fn send_text(
    store: &CredentialStore,
    messaging: &services::ImplMessagingService,
    sender: &str,
    recipient: &str,
    message: &str,
) -> Result<serde_json::Value, RelayError> {
    let credential = store
        .resolve(sender)
        .ok_or_else(|| RelayError::SenderNotFound(sender.to_string()))?;
    debug!("Sender's credentials found for {}", sender);

    let response = messaging
        .send_text(credential, recipient, message)
        .await
        .map_err(|e| {
            metric::incr_send_statds("text_failed");
            RelayError::ProviderError(format!("{e:#}"))
        })?;

    info!("Text message sent from {} to {}", credential.phone_number_id, recipient);
    metric::incr_send_statds("text_sent");
    Ok(response)
}

/// Sends a template message from `sender` to `recipient`.
///
/// `components` are forwarded to WhatsApp as given.
///
/// # Errors
/// Same as [`send_text`].
pub async fn send_template(
    store: &CredentialStore,
    messaging: &services::ImplMessagingService,
    sender: &str,
    template: &str,
    recipient: &str,
    components: &[serde_json::Value],
    lang: &str,
) -> Result<serde_json::Value, RelayError> {
    let credential = store
        .resolve(sender)
        .ok_or_else(|| RelayError::SenderNotFound(sender.to_string()))?;
    debug!("Sender's credentials found for {}", sender);

    let response = messaging
        .send_template(credential, recipient, template, components, lang)
        .await
        .map_err(|e| {
            metric::incr_send_statds("template_failed");
            RelayError::ProviderError(format!("{e:#}"))
        })?;

    info!(
        "Template '{}' sent from {} to {}",
        template, credential.phone_number_id, recipient
    );
    metric::incr_send_statds("template_sent");
    Ok(response)
}
