pub const API_PREFIX: &str = "/v1";
pub const WEBHOOK_ACK_BODY: &str = "OK";
pub const VERIFY_REJECTED_BODY: &str = "Invalid verification token";
pub const INTERNAL_ERROR_BODY: &str = "Internal Server Error";
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";
pub const MESSAGES_FIELD: &str = "messages";
pub const TEXT_MESSAGE_TYPE: &str = "text";
pub const RELAY_USER_AGENT: &str = concat!("whatsapp-relay/", env!("CARGO_PKG_VERSION"));

pub fn whatsapp_messages_endpoint(graph_api_url: &str, phone_number_id: &str) -> String {
    format!(
        "{base}/{id}/messages",
        base = graph_api_url.trim_end_matches('/'),
        id = phone_number_id
    )
}
