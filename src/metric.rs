use opentelemetry::{KeyValue, metrics::UpDownCounter};
use std::sync::LazyLock;

static STATDS: LazyLock<UpDownCounter<i64>> = LazyLock::new(|| {
    logfire::i64_up_down_counter("whatsapp_relay_statds")
        .with_description("WhatsApp relay statistics")
        .with_unit("attempt")
        .build()
});

fn incr_statds(metric: String, value: String) {
    STATDS.add(1, &[KeyValue::new(metric, value)]);
}

/// `relayed` or the skip reason label
pub fn incr_webhook_statds(outcome: &str) {
    incr_statds("webhook".to_string(), outcome.into())
}

/// `delivered` or `failed`, once per subscriber URL
pub fn incr_delivery_statds(outcome: &str) {
    incr_statds("delivery".to_string(), outcome.into())
}

pub fn incr_send_statds(outcome: &str) {
    incr_statds("send".to_string(), outcome.into())
}
