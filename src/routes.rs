//! Route configuration.

use crate::{api, consts, webhook};
use ntex::web;

/// Configures the versioned relay API.
///
/// # Routes
/// - `POST /v1/send/{message_type}` - Send a text or template message
/// - `GET /v1/receive` - WhatsApp webhook verification
/// - `POST /v1/receive` - WhatsApp webhook receiver
pub fn v1(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope(consts::API_PREFIX).service((
        api::routes::send_message,
        webhook::whatsapp::verify,
        webhook::whatsapp::receive,
    )));
}
