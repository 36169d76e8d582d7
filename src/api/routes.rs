//! Outbound message endpoints.
//!
//! `POST /v1/send/{message_type}` where `message_type` is `text` or `template`.

use crate::{api, errors::RelayError, server::AppState};
use ntex::{util::Bytes, web};
use serde::Deserialize;

/// Request body of `/send/{message_type}`.
///
/// Every field is optional here so that a missing one is reported with a
/// descriptive message instead of a generic decoding error.
#[derive(Debug, Default, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub components: Option<serde_json::Value>,
    #[serde(default)]
    pub lang: Option<String>,
}

/// Returns the field value, rejecting missing and empty strings
fn required<'a>(field: &'a Option<String>, error_msg: &str) -> Result<&'a str, RelayError> {
    match field.as_deref() {
        Some(value) if !value.is_empty() => Ok(value),
        _ => {
            logfire::warn!("{error}", error = error_msg.to_string());
            Err(RelayError::BadRequest(error_msg.to_string()))
        }
    }
}

/// Sends a text or template message on behalf of `sender`.
///
/// # Returns
/// - 200 with the WhatsApp API response
/// - 400 on a missing field, non-list components or unknown message type
/// - 404 when the sender is not configured
/// - 500 when WhatsApp rejects the request
#[web::post("/send/{message_type}")]
pub async fn send_message(
    message_type: web::types::Path<String>,
    body: Bytes,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let request: SendMessageRequest = serde_json::from_slice(&body)
        .map_err(|e| RelayError::BadRequest(format!("Invalid JSON body: {e}")))?;

    let sender = required(&request.sender, "No Sender Provided")?;
    let recipient = required(&request.recipient, "No Recipient Provided")?;

    let response = match message_type.as_str() {
        "text" => {
            let message = required(&request.message, "No Message Provided")?;

            api::messages::send_text(
                &app_state.credentials,
                &app_state.messaging_service,
                sender,
                recipient,
                message,
            )
            .await?
        }
        "template" => {
            let template = required(&request.template, "No Template Provided")?;
            let Some(serde_json::Value::Array(components)) = request.components.as_ref() else {
                logfire::warn!("Components must be list");
                return Err(RelayError::BadRequest("Components must be list".to_string()).into());
            };
            let lang = required(&request.lang, "No Lang Provided")?;

            api::messages::send_template(
                &app_state.credentials,
                &app_state.messaging_service,
                sender,
                template,
                recipient,
                components,
                lang,
            )
            .await?
        }
        other => {
            return Err(
                RelayError::BadRequest(format!("Unsupported message type '{other}'")).into(),
            );
        }
    };

    Ok(web::HttpResponse::Ok().json(&response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        routes,
        server::tests::create_test_app_state,
        services::{MockMessagingService, MockRelayService},
    };
    use ntex::{http, web::test};
    use serde_json::json;

    async fn post_send(
        messaging: MockMessagingService,
        message_type: &str,
        body: serde_json::Value,
    ) -> web::WebResponse {
        let app = test::init_service(
            web::App::new()
                .state(create_test_app_state(messaging, MockRelayService::new()))
                .configure(routes::v1),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/v1/send/{message_type}"))
            .header("content-type", "application/json")
            .set_payload(body.to_string())
            .to_request();

        test::call_service(&app, req).await
    }

    fn no_messaging() -> MockMessagingService {
        let mut mock_messaging = MockMessagingService::new();
        mock_messaging.expect_send_text().never();
        mock_messaging.expect_send_template().never();
        mock_messaging
    }

    #[ntex::test]
    async fn test_send_text_without_message_is_bad_request() {
        let resp = post_send(no_messaging(), "text", json!({"sender": "S", "recipient": "R"})).await;

        assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST);
        assert_eq!(test::read_body(resp).await, Bytes::from_static(b"No Message Provided"));
    }

    #[ntex::test]
    async fn test_send_missing_sender_and_recipient() {
        let resp = post_send(no_messaging(), "text", json!({"recipient": "R", "message": "hi"})).await;
        assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST);

        let resp = post_send(no_messaging(), "text", json!({"sender": "", "recipient": "R"})).await;
        assert_eq!(test::read_body(resp).await, Bytes::from_static(b"No Sender Provided"));

        let resp = post_send(no_messaging(), "text", json!({"sender": "S", "message": "hi"})).await;
        assert_eq!(test::read_body(resp).await, Bytes::from_static(b"No Recipient Provided"));
    }

    #[ntex::test]
    async fn test_send_text_unknown_sender_is_not_found() {
        let resp = post_send(
            no_messaging(),
            "text",
            json!({"sender": "S", "recipient": "R", "message": "hi"}),
        )
        .await;

        assert_eq!(resp.status(), http::StatusCode::NOT_FOUND);
    }

    #[ntex::test]
    async fn test_send_text_returns_provider_response() {
        let mut mock_messaging = MockMessagingService::new();
        mock_messaging
            .expect_send_text()
            .times(1)
            .returning(|_, _, _| Ok(json!({"messages": [{"id": "wamid.1"}]})));

        let resp = post_send(
            mock_messaging,
            "text",
            json!({"sender": "1000", "recipient": "2348011111111", "message": "hi"}),
        )
        .await;

        assert_eq!(resp.status(), http::StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await).unwrap();
        assert_eq!(body, json!({"messages": [{"id": "wamid.1"}]}));
    }

    #[ntex::test]
    async fn test_send_text_provider_error_hides_detail() {
        let mut mock_messaging = MockMessagingService::new();
        mock_messaging
            .expect_send_text()
            .times(1)
            .returning(|_, _, _| anyhow::bail!("WhatsApp API returned error status 401: bad token"));

        let resp = post_send(
            mock_messaging,
            "text",
            json!({"sender": "1000", "recipient": "R", "message": "hi"}),
        )
        .await;

        assert_eq!(resp.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(test::read_body(resp).await, Bytes::from_static(b"Internal Server Error"));
    }

    #[ntex::test]
    async fn test_send_template_validation() {
        let base = json!({"sender": "1000", "recipient": "R", "template": "otp", "lang": "en_US"});

        let mut body = base.clone();
        body["components"] = json!({"type": "body"});
        let resp = post_send(no_messaging(), "template", body).await;
        assert_eq!(test::read_body(resp).await, Bytes::from_static(b"Components must be list"));

        let resp = post_send(no_messaging(), "template", base.clone()).await;
        assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST);

        let mut body = base;
        body["components"] = json!([]);
        body.as_object_mut().unwrap().remove("lang");
        let resp = post_send(no_messaging(), "template", body).await;
        assert_eq!(test::read_body(resp).await, Bytes::from_static(b"No Lang Provided"));
    }

    #[ntex::test]
    async fn test_send_template_success() {
        let mut mock_messaging = MockMessagingService::new();
        mock_messaging
            .expect_send_template()
            .withf(|_, _, template, components, _| template.starts_with("otp") && components.len() == 1)
            .times(1)
            .returning(|_, _, _, _, _| Ok(json!({"messages": [{"id": "wamid.2"}]})));

        let resp = post_send(
            mock_messaging,
            "template",
            json!({
                "sender": "1000",
                "recipient": "R",
                "template": "otp",
                "components": [{"type": "body", "parameters": []}],
                "lang": "en_US"
            }),
        )
        .await;

        assert_eq!(resp.status(), http::StatusCode::OK);
    }

    #[ntex::test]
    async fn test_send_unknown_type_and_invalid_json() {
        let resp = post_send(
            no_messaging(),
            "image",
            json!({"sender": "1000", "recipient": "R"}),
        )
        .await;
        assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST);

        let resp = post_send(no_messaging(), "text", json!("just a string")).await;
        assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST);
    }
}
