//! # WhatsApp Outgoing Message Schemas
//!
//! Request bodies for the WhatsApp Business API `/messages` endpoint.

use serde::{Deserialize, Serialize};

/// Text message to send to WhatsApp
#[derive(Debug, Serialize, Deserialize)]
pub struct OutgoingTextMessage {
    /// Messaging product, always "whatsapp"
    pub messaging_product: String,
    /// Always "individual"
    pub recipient_type: String,
    /// Recipient's WhatsApp ID (phone number)
    pub to: String,
    /// Message type
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Text content
    pub text: OutgoingTextContent,
}

impl OutgoingTextMessage {
    /// Creates a new text message
    pub fn new(to: String, body: String) -> Self {
        Self {
            messaging_product: "whatsapp".to_string(),
            recipient_type: "individual".to_string(),
            to,
            msg_type: "text".to_string(),
            text: OutgoingTextContent {
                preview_url: false,
                body,
            },
        }
    }
}

/// Text content for outgoing messages
#[derive(Debug, Serialize, Deserialize)]
pub struct OutgoingTextContent {
    /// Whether WhatsApp renders a link preview
    pub preview_url: bool,
    /// Message body text
    pub body: String,
}

/// Template message to send to WhatsApp
#[derive(Debug, Serialize, Deserialize)]
pub struct OutgoingTemplateMessage {
    /// Messaging product, always "whatsapp"
    pub messaging_product: String,
    /// Recipient's WhatsApp ID (phone number)
    pub to: String,
    /// Message type, "template"
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Template reference and parameters
    pub template: TemplateContent,
}

impl OutgoingTemplateMessage {
    /// Creates a new template message. `components` are forwarded untouched.
    pub fn new(
        to: String,
        name: String,
        lang: String,
        components: Vec<serde_json::Value>,
    ) -> Self {
        Self {
            messaging_product: "whatsapp".to_string(),
            to,
            msg_type: "template".to_string(),
            template: TemplateContent {
                name,
                language: TemplateLanguage { code: lang },
                components,
            },
        }
    }
}

/// Template content
#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateContent {
    /// Template name as approved in WhatsApp Manager
    pub name: String,
    /// Template language
    pub language: TemplateLanguage,
    /// Header, body and button components
    pub components: Vec<serde_json::Value>,
}

/// Template language
#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateLanguage {
    /// Language code (e.g. "en_US")
    pub code: String,
}
