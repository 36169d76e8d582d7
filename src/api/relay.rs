//! # Relay Delivery Module
//!
//! Fans a relay payload out to every configured subscriber URL.

use crate::{
    metric,
    models::relay::{DeliveryReport, RelayPayload},
    services,
};
use futures::future::join_all;
use tracing::info;

/// Posts `payload` to each URL in `urls`, once.
///
/// A failing subscriber is logged and never stops delivery to the others.
/// Requests run concurrently; the report keeps the order of `urls`.
/// Nothing is retried or queued.
pub async fn deliver(
    payload: &RelayPayload,
    urls: &[String],
    relay_service: &services::ImplRelayService,
) -> DeliveryReport {
    let attempts = urls.iter().map(|url| async move {
        let result = relay_service.post_payload(url, payload).await;
        (url, result)
    });

    let mut report = DeliveryReport::default();
    for (url, result) in join_all(attempts).await {
        match result {
            Ok(()) => {
                info!("Relayed message {} to {}", payload.message_id, url);
                metric::incr_delivery_statds("delivered");
                report.delivered.push(url.clone());
            }
            Err(e) => {
                logfire::error!(
                    "Failed to relay message {message_id} to {url}: {error}",
                    message_id = payload.message_id.clone(),
                    url = url.clone(),
                    error = format!("{e:#}")
                );
                metric::incr_delivery_statds("failed");
                report.failed.push((url.clone(), format!("{e:#}")));
            }
        }
    }

    report
}
