use crate::consts;
use derive_more::{Display, Error};
use ntex::{http, web};

#[derive(Debug, Display, Error)]
pub enum RelayError {
    /// Missing or invalid request field
    #[display("{_0}")]
    BadRequest(#[error(not(source))] String),
    /// Sender identity is not configured
    #[display("Sender '{_0}' Not Found")]
    SenderNotFound(#[error(not(source))] String),
    /// Webhook body does not have the expected shape
    #[display("Malformed webhook event: {_0}")]
    MalformedEvent(#[error(not(source))] String),
    /// Webhook signature check failed
    #[display("Unauthorized")]
    Unauthorized,
    /// The WhatsApp send API call failed
    #[display("WhatsApp provider error: {_0}")]
    ProviderError(#[error(not(source))] String),
}

impl RelayError {
    /// Body sent to the client, never carries internal detail
    fn client_message(&self) -> String {
        match self {
            RelayError::BadRequest(msg) => msg.clone(),
            RelayError::SenderNotFound(_) => "Sender Not Found".to_string(),
            RelayError::MalformedEvent(_) => "Malformed webhook event".to_string(),
            RelayError::Unauthorized => "Unauthorized".to_string(),
            RelayError::ProviderError(_) => consts::INTERNAL_ERROR_BODY.to_string(),
        }
    }
}

impl web::error::WebResponseError for RelayError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        match self {
            RelayError::ProviderError(_) => {
                logfire::error!("{error}", error = self.to_string());
            }
            _ => {
                logfire::warn!("{error}", error = self.to_string());
            }
        }

        web::HttpResponse::build(self.status_code())
            .set_header("content-type", "text/plain; charset=utf-8")
            .body(self.client_message())
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            RelayError::BadRequest(_) | RelayError::MalformedEvent(_) => {
                http::StatusCode::BAD_REQUEST
            }
            RelayError::SenderNotFound(_) => http::StatusCode::NOT_FOUND,
            RelayError::Unauthorized => http::StatusCode::UNAUTHORIZED,
            RelayError::ProviderError(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
