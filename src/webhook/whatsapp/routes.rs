//! WhatsApp webhook endpoint handlers
//!
//! Implements the verification endpoint (GET) and the webhook receiver (POST).
//!
//! # Security
//!
//! When `WHATSAPP_APP_SECRET` is configured the POST endpoint checks the
//! `X-Hub-Signature-256` header against the raw body before decoding it.

use super::{handler, schemas, security};
use crate::{consts, errors::RelayError, server::AppState};
use ntex::{util::Bytes, web};
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tracing::{Instrument, info, info_span};

/// Query parameters for webhook verification
#[derive(Debug, Default, Deserialize)]
pub struct VerifyQuery {
    /// The mode parameter, normally "subscribe"
    #[serde(rename = "hub.mode", default)]
    pub mode: Option<String>,
    /// The verification token from WhatsApp
    #[serde(rename = "hub.verify_token", default)]
    pub verify_token: Option<String>,
    /// The challenge string to echo back
    #[serde(rename = "hub.challenge", default)]
    pub challenge: Option<String>,
}

/// Byte-for-byte, constant time token comparison. Empty tokens never match.
fn token_matches(candidate: &str, expected: &str) -> bool {
    if candidate.is_empty() || expected.is_empty() {
        return false;
    }

    candidate.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Webhook verification endpoint (GET)
///
/// # Query Parameters
/// - `hub.mode` - Should be "subscribe", logged only
/// - `hub.verify_token` - Token configured in WhatsApp dashboard
/// - `hub.challenge` - Challenge string to echo back
///
/// # Returns
/// - 200 with the challenge string if the token matches
/// - 200 with a rejection text otherwise, WhatsApp only reads the body
#[web::get("/receive")]
pub async fn verify(
    query: web::types::Query<VerifyQuery>,
    app_state: web::types::State<AppState>,
) -> impl web::Responder {
    let candidate = query.verify_token.as_deref().unwrap_or_default();

    if !token_matches(candidate, &app_state.verify_token) {
        logfire::warn!(
            "Webhook verification rejected (mode={mode})",
            mode = query.mode.clone().unwrap_or_default()
        );
        return web::HttpResponse::Ok()
            .content_type("text/plain")
            .body(consts::VERIFY_REJECTED_BODY);
    }

    info!("Webhook verification successful");

    web::HttpResponse::Ok()
        .content_type("text/plain")
        .body(query.challenge.clone().unwrap_or_default())
}

/// Webhook receiver endpoint (POST)
///
/// Processed synchronously: the body is decoded, normalized and relayed to
/// every subscriber before WhatsApp gets its acknowledgement.
///
/// # Returns
/// - 200 `OK` once processed, whether relayed or skipped
/// - 400 when the body is not a webhook event
/// - 401 when the signature check fails
#[web::post("/receive")]
pub async fn receive(
    req: web::HttpRequest,
    body: Bytes,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let signature = req
        .headers()
        .get(consts::SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    security::check_signature(signature, &body, app_state.app_secret.as_deref())?;

    let payload: schemas::WebhookPayload = serde_json::from_slice(&body)
        .map_err(|e| RelayError::MalformedEvent(e.to_string()))?;

    handler::process_webhook(
        &payload,
        &app_state.credentials,
        &app_state.subscriber_urls,
        &app_state.relay_service,
    )
    .instrument(info_span!("whatsapp_webhook"))
    .await;

    Ok(web::HttpResponse::Ok()
        .content_type("text/plain")
        .body(consts::WEBHOOK_ACK_BODY))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        routes,
        server::tests::create_test_app_state,
        services::{MockMessagingService, MockRelayService},
        webhook::whatsapp::{handler::tests::text_event_json, security::sign},
    };
    use ntex::{http, web::test};

    #[test]
    fn test_verify_query_deserialization() {
        let json = r#"{"hub.mode":"subscribe","hub.verify_token":"test123","hub.challenge":"challenge123"}"#;
        let query: VerifyQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.mode.as_deref(), Some("subscribe"));
        assert_eq!(query.verify_token.as_deref(), Some("test123"));
        assert_eq!(query.challenge.as_deref(), Some("challenge123"));

        let query: VerifyQuery = serde_json::from_str("{}").unwrap();
        assert!(query.verify_token.is_none());
    }

    #[test]
    fn test_token_matches() {
        assert!(token_matches("verify-secret", "verify-secret"));
        assert!(!token_matches("verify-secre", "verify-secret"));
        assert!(!token_matches("", "verify-secret"));
        assert!(!token_matches("", ""));
    }

    fn no_relay() -> MockRelayService {
        let mut mock_relay = MockRelayService::new();
        mock_relay.expect_post_payload().never();
        mock_relay
    }

    #[ntex::test]
    async fn test_verify_echoes_challenge() {
        let app = test::init_service(
            web::App::new()
                .state(create_test_app_state(MockMessagingService::new(), no_relay()))
                .configure(routes::v1),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/v1/receive?hub.mode=subscribe&hub.verify_token=verify-secret&hub.challenge=abc123")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(test::read_body(resp).await, Bytes::from_static(b"abc123"));
    }

    #[ntex::test]
    async fn test_verify_rejects_wrong_token_with_ok_status() {
        let app = test::init_service(
            web::App::new()
                .state(create_test_app_state(MockMessagingService::new(), no_relay()))
                .configure(routes::v1),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/v1/receive?hub.verify_token=nope&hub.challenge=abc123")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), http::StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_ne!(body, Bytes::from_static(b"abc123"));
        assert_eq!(body, Bytes::from_static(consts::VERIFY_REJECTED_BODY.as_bytes()));
    }

    #[ntex::test]
    async fn test_verify_with_empty_configured_token_rejects_missing_token() {
        let mut app_state = create_test_app_state(MockMessagingService::new(), no_relay());
        app_state.verify_token = String::new();
        let app = test::init_service(web::App::new().state(app_state).configure(routes::v1)).await;

        for uri in [
            "/v1/receive?hub.challenge=abc123",
            "/v1/receive?hub.verify_token=&hub.challenge=abc123",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;

            assert_eq!(resp.status(), http::StatusCode::OK);
            assert_eq!(
                test::read_body(resp).await,
                Bytes::from_static(consts::VERIFY_REJECTED_BODY.as_bytes())
            );
        }
    }

    #[ntex::test]
    async fn test_receive_relays_text_message() {
        let mut mock_relay = MockRelayService::new();
        mock_relay
            .expect_post_payload()
            .times(3)
            .returning(|url, payload| {
                assert_eq!(payload.sender_phone_number, "2348011111111");
                assert_eq!(payload.recipient_phone_number, "+2348000000000");
                if url.ends_with("/two") {
                    anyhow::bail!("Subscriber returned error status 500")
                }
                Ok(())
            });

        let app = test::init_service(
            web::App::new()
                .state(create_test_app_state(MockMessagingService::new(), mock_relay))
                .configure(routes::v1),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/receive")
            .header("content-type", "application/json")
            .set_payload(text_event_json("1000", "text").to_string())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(test::read_body(resp).await, Bytes::from_static(b"OK"));
    }

    #[ntex::test]
    async fn test_receive_non_text_message_is_acknowledged() {
        let app = test::init_service(
            web::App::new()
                .state(create_test_app_state(MockMessagingService::new(), no_relay()))
                .configure(routes::v1),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/receive")
            .set_payload(text_event_json("1000", "sticker").to_string())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), http::StatusCode::OK);
    }

    #[ntex::test]
    async fn test_receive_missing_entry_is_bad_request() {
        let app = test::init_service(
            web::App::new()
                .state(create_test_app_state(MockMessagingService::new(), no_relay()))
                .configure(routes::v1),
        )
        .await;

        for body in [r#"{"object": "whatsapp_business_account"}"#, "not json"] {
            let req = test::TestRequest::post()
                .uri("/v1/receive")
                .set_payload(body)
                .to_request();
            let resp = test::call_service(&app, req).await;

            assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST);
        }
    }

    #[ntex::test]
    async fn test_receive_checks_signature_when_secret_configured() {
        let mut app_state = create_test_app_state(MockMessagingService::new(), no_relay());
        app_state.app_secret = Some("app-secret".into());
        let app = test::init_service(web::App::new().state(app_state).configure(routes::v1)).await;

        let body = text_event_json("9999", "text").to_string();

        let req = test::TestRequest::post()
            .uri("/v1/receive")
            .header(consts::SIGNATURE_HEADER, sign(body.as_bytes(), "other-secret"))
            .set_payload(body.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), http::StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/v1/receive")
            .header(consts::SIGNATURE_HEADER, sign(body.as_bytes(), "app-secret"))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), http::StatusCode::OK);
    }
}
