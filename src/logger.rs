use log::LevelFilter;
use simplelog::{ConfigBuilder, SimpleLogger};

/// Console logger used when no Logfire token is configured.
///
/// Only records from this crate and the ntex access log pass through.
pub fn setup_simple_logger(level: LevelFilter) -> anyhow::Result<()> {
    let logger_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("whatsapp_relay")
        .add_filter_allow_str("ntex::web::middleware::logger")
        .build();

    Ok(SimpleLogger::init(level, logger_config)?)
}
