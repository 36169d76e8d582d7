use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Platform agnostic representation of one inbound text message.
///
/// This is the JSON body posted to every subscriber URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelayPayload {
    /// Display number of the business account that received the message
    pub recipient_phone_number: String,
    /// Profile name of the sender, empty when WhatsApp did not share it
    pub sender_name: String,
    /// Sender's WhatsApp ID (phone number)
    pub sender_phone_number: String,
    /// Text body
    pub message: String,
    /// WhatsApp message ID
    pub message_id: String,
}

/// Why a webhook event produced nothing to relay.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SkipReason {
    #[display("no metadata")]
    NoMetadata,
    #[display("business '{_0}' not found")]
    BusinessNotFound(String),
    #[display("not a message event")]
    NotMessageEvent,
    #[display("no sender mobile")]
    NoSenderMobile,
    #[display("no message")]
    NoMessage,
    #[display("unsupported message type '{_0}'")]
    UnsupportedMessageType(String),
}

impl SkipReason {
    /// Short label used as metric value
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::NoMetadata => "no_metadata",
            SkipReason::BusinessNotFound(_) => "business_not_found",
            SkipReason::NotMessageEvent => "not_message_event",
            SkipReason::NoSenderMobile => "no_sender_mobile",
            SkipReason::NoMessage => "no_message",
            SkipReason::UnsupportedMessageType(_) => "unsupported_message_type",
        }
    }
}

/// Result of normalizing a webhook event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Relay(RelayPayload),
    Skip(SkipReason),
}

/// Outcome of one fan-out, in the order the subscriber URLs are configured.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: Vec<String>,
    /// `(url, error)` pairs
    pub failed: Vec<(String, String)>,
}

impl DeliveryReport {
    pub fn all_delivered(&self) -> bool {
        self.failed.is_empty()
    }
}
