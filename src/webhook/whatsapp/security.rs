//! Signature verification for incoming WhatsApp webhook requests
//!
//! Meta signs every webhook body with HMAC-SHA256 keyed by the app secret and
//! sends it as `X-Hub-Signature-256: sha256=<hex>`. The check runs on the raw
//! body bytes, before any JSON decoding, and only when `WHATSAPP_APP_SECRET`
//! is configured.

use crate::errors::RelayError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Verifies the X-Hub-Signature-256 header against the request payload
///
/// # Arguments
///
/// * `signature_header` - The value of the X-Hub-Signature-256 header (e.g., "sha256=abc123...")
/// * `payload` - The raw request body bytes
/// * `app_secret` - WhatsApp/Facebook app secret
///
/// # Returns
///
/// `true` only when the header is well formed and the signature matches.
/// The comparison is constant time.
pub fn verify_signature(signature_header: &str, payload: &[u8], app_secret: &str) -> bool {
    let Some(signature_hex) = signature_header.strip_prefix("sha256=") else {
        logfire::warn!("Invalid signature header format: expected 'sha256=' prefix");
        return false;
    };

    let expected_signature = match hex::decode(signature_hex) {
        Ok(sig) => sig,
        Err(e) => {
            logfire::warn!(
                "Failed to decode signature hex: {error}",
                error = e.to_string()
            );
            return false;
        }
    };

    let mut mac = match HmacSha256::new_from_slice(app_secret.as_bytes()) {
        Ok(m) => m,
        Err(e) => {
            logfire::error!(
                "Failed to create HMAC instance: {error}",
                error = e.to_string()
            );
            return false;
        }
    };

    mac.update(payload);
    let computed_signature = mac.finalize().into_bytes();

    let is_valid: bool = computed_signature.ct_eq(&expected_signature[..]).into();

    if !is_valid {
        logfire::warn!("Webhook signature verification failed: signatures do not match");
    }

    is_valid
}

/// Rejects the request unless the signature matches, when a secret is configured.
pub fn check_signature(
    signature_header: Option<&str>,
    payload: &[u8],
    app_secret: Option<&str>,
) -> Result<(), RelayError> {
    let Some(app_secret) = app_secret.filter(|s| !s.is_empty()) else {
        return Ok(());
    };

    match signature_header {
        Some(header) if verify_signature(header, payload, app_secret) => Ok(()),
        Some(_) => Err(RelayError::Unauthorized),
        None => {
            logfire::warn!("Missing X-Hub-Signature-256 header");
            Err(RelayError::Unauthorized)
        }
    }
}

/// Builds the header value Meta would send for `payload`
#[cfg(test)]
pub(crate) fn sign(payload: &[u8], secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(payload);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}
