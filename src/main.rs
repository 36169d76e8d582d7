//! # WhatsApp Relay
//!
//! Receives WhatsApp Cloud API webhooks, relays inbound text messages to the
//! configured subscriber URLs and sends outbound text and template messages
//! on behalf of the configured business numbers.

#![recursion_limit = "256"]

pub mod api;
pub mod config;
pub mod consts;
pub mod errors;
pub mod logger;
pub mod metric;
pub mod models;
pub mod routes;
pub mod server;
pub mod services;
pub mod webhook;

use clap::Parser;
use logfire::config::MetricsOptions;

#[derive(Parser, Debug)]
#[command(version, about = "WhatsApp webhook relay")]
struct Args {
    /// Console log level, ignored when LOGFIRE_TOKEN is set
    #[arg(short, long, default_value = "info")]
    logs: log::LevelFilter,
}

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize configuration
    let app_config = config::init_config()?;

    // Initialize logging and metrics
    let shutdown_handler = match app_config.logfire_token.as_deref() {
        Some(token) if !token.is_empty() => Some(
            logfire::configure()
                .install_panic_handler()
                .with_metrics(Some(MetricsOptions::default()))
                .send_to_logfire(logfire::config::SendToLogfire::Yes)
                .with_token(token)
                .finish()?,
        ),
        _ => {
            logger::setup_simple_logger(args.logs)?;
            None
        }
    };

    server::configure_and_run_server(app_config).await?;

    if let Some(shutdown_handler) = shutdown_handler {
        shutdown_handler.shutdown()?;
    }

    Ok(())
}
