//! # WhatsApp Webhook Handler
//!
//! Turns webhook events into relay payloads and hands them to the fan-out.
//!
//! Only the first change of the first entry is inspected for the message
//! itself, which is how WhatsApp delivers a single inbound message. The
//! business metadata is searched across every change.

use super::schemas::{Change, Metadata, WebhookPayload};
use crate::{
    api, consts, metric,
    models::{
        credential::CredentialStore,
        relay::{DeliveryReport, Normalized, RelayPayload, SkipReason},
    },
    services,
};
use tracing::{debug, info};

/// Returns the metadata of the first change that carries one, in event order.
pub fn extract_metadata(payload: &WebhookPayload) -> Option<&Metadata> {
    payload
        .entry
        .iter()
        .flat_map(|entry| &entry.changes)
        .find_map(|change| change.value.metadata.as_ref())
}

fn first_change(payload: &WebhookPayload) -> Option<&Change> {
    payload.entry.first().and_then(|entry| entry.changes.first())
}

/// Converts a webhook event into the payload relayed to subscribers.
///
/// # Process
/// 1. Extract business metadata
/// 2. Resolve the business credential from its phone number ID
/// 3. Require a "messages" change
/// 4. Require a sender mobile
/// 5. Require a message, of type "text"
/// 6. Build the payload, the business display number being the recipient
///
/// Every step that fails yields a [`SkipReason`] instead of an error.
pub fn normalize(payload: &WebhookPayload, store: &CredentialStore) -> Normalized {
    let Some(metadata) = extract_metadata(payload) else {
        return Normalized::Skip(SkipReason::NoMetadata);
    };

    let Some(business) = store.resolve(&metadata.phone_number_id) else {
        return Normalized::Skip(SkipReason::BusinessNotFound(
            metadata.phone_number_id.clone(),
        ));
    };

    let Some(change) = first_change(payload)
        .filter(|change| change.field.as_deref() == Some(consts::MESSAGES_FIELD))
    else {
        return Normalized::Skip(SkipReason::NotMessageEvent);
    };

    let Some((contact, sender_mobile)) = change
        .value
        .contacts
        .as_ref()
        .and_then(|contacts| contacts.first())
        .and_then(|contact| {
            let wa_id = contact.wa_id.as_deref().filter(|wa_id| !wa_id.is_empty())?;
            Some((contact, wa_id))
        })
    else {
        return Normalized::Skip(SkipReason::NoSenderMobile);
    };

    let Some(message) = change
        .value
        .messages
        .as_ref()
        .and_then(|messages| messages.first())
    else {
        return Normalized::Skip(SkipReason::NoMessage);
    };

    let sender_name = contact
        .profile
        .as_ref()
        .map(|profile| profile.name.clone())
        .unwrap_or_default();

    debug!(
        "New Message; sender_mobile:{} sender_name:{} message_type:{} message_id:{}",
        sender_mobile, sender_name, message.msg_type, message.id
    );

    if message.msg_type != consts::TEXT_MESSAGE_TYPE {
        return Normalized::Skip(SkipReason::UnsupportedMessageType(message.msg_type.clone()));
    }

    let Some(text) = message.text.as_ref() else {
        return Normalized::Skip(SkipReason::NoMessage);
    };

    let recipient_phone_number = business
        .phone_number
        .clone()
        .or_else(|| metadata.display_phone_number.clone())
        .unwrap_or_else(|| business.phone_number_id.clone());

    Normalized::Relay(RelayPayload {
        recipient_phone_number,
        sender_name,
        sender_phone_number: sender_mobile.to_string(),
        message: text.body.clone(),
        message_id: message.id.clone(),
    })
}

/// Main webhook processor
///
/// Normalizes the event and, when it holds a text message, relays it to
/// every subscriber. Returns the delivery report, `None` when skipped.
pub async fn process_webhook(
    payload: &WebhookPayload,
    store: &CredentialStore,
    subscriber_urls: &[String],
    relay_service: &services::ImplRelayService,
) -> Option<DeliveryReport> {
    let relay_payload = match normalize(payload, store) {
        Normalized::Relay(relay_payload) => relay_payload,
        Normalized::Skip(reason) => {
            info!("Webhook event not relayed: {}", reason);
            metric::incr_webhook_statds(reason.label());
            return None;
        }
    };

    metric::incr_webhook_statds("relayed");
    let report = api::relay::deliver(&relay_payload, subscriber_urls, relay_service).await;

    info!(
        "Message {} relayed to {}/{} subscribers",
        relay_payload.message_id,
        report.delivered.len(),
        subscriber_urls.len()
    );

    Some(report)
}
