//! Web server setup: shared state, TLS and middleware.

use crate::{
    config::AppConfig,
    models::credential::CredentialStore,
    routes,
    services::{self, relay::RelayHandler},
    webhook::whatsapp::client::WhatsAppClient,
};
use anyhow::Context;
use ntex::web;
use ntex_cors::Cors;
use openssl::ssl::{SslAcceptor, SslFiletype, SslMethod};
use std::sync::Arc;
use tracing::info;

/// Per-worker application state.
///
/// The credential table and subscriber list are loaded once and shared
/// read-only between workers.
pub struct AppState {
    pub credentials: Arc<CredentialStore>,
    pub subscriber_urls: Arc<Vec<String>>,
    /// SENSITIVE: webhook verification token
    pub verify_token: String,
    /// SENSITIVE: app secret, enables signature verification when set
    pub app_secret: Option<String>,
    pub messaging_service: services::ImplMessagingService,
    pub relay_service: services::ImplRelayService,
}

/// Configures SSL acceptor for production environments
fn setup_ssl_acceptor(
    certificate_path: &str,
    private_key_path: &str,
    chain_path: Option<&str>,
) -> anyhow::Result<openssl::ssl::SslAcceptorBuilder> {
    let mut ssl_acceptor = SslAcceptor::mozilla_intermediate(SslMethod::tls_server())
        .map_err(|e| anyhow::anyhow!("Failed to create SSL acceptor: {}", e))?;

    ssl_acceptor
        .set_private_key_file(private_key_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load private key from {}: {}",
                private_key_path,
                e
            )
        })?;

    ssl_acceptor
        .set_certificate_file(certificate_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load certificate from {}: {}",
                certificate_path,
                e
            )
        })?;

    if let Some(chain_path) = chain_path.filter(|p| !p.is_empty()) {
        ssl_acceptor
            .set_certificate_chain_file(chain_path)
            .map_err(|e| {
                anyhow::anyhow!("Failed to load certificate chain from {}: {}", chain_path, e)
            })?;
    }

    Ok(ssl_acceptor)
}

/// Configures and starts the web server with appropriate SSL settings
pub async fn configure_and_run_server(app_config: &'static AppConfig) -> anyhow::Result<()> {
    let credentials = Arc::new(app_config.credential_store()?);
    let subscriber_urls = Arc::new(app_config.subscriber_urls()?);
    let relay_handler = RelayHandler::new(app_config.relay_timeout())?;
    let whatsapp_client = WhatsAppClient::new(
        app_config.whatsapp_graph_api_url.clone(),
        app_config.whatsapp_timeout(),
    )?;
    let origins = app_config.allowed_origins();

    info!(
        "Loaded {} credentials and {} subscriber urls",
        credentials.len(),
        subscriber_urls.len()
    );
    if app_config.whatsapp_app_secret.is_none() {
        info!("WHATSAPP_APP_SECRET not set, webhook signatures are not verified");
    }

    let server = web::server(move || {
        web::App::new()
            .wrap(
                origins
                    .iter()
                    .fold(
                        Cors::new().allowed_methods(vec!["GET", "POST", "OPTIONS"]),
                        |cors, origin| cors.allowed_origin(origin),
                    )
                    .finish(),
            )
            .wrap(web::middleware::Logger::default())
            .wrap(web::middleware::Compress::default())
            .state(AppState {
                credentials: credentials.clone(),
                subscriber_urls: subscriber_urls.clone(),
                verify_token: app_config.whatsapp_verify_token.clone(),
                app_secret: app_config.whatsapp_app_secret.clone(),
                messaging_service: Box::new(whatsapp_client.clone()),
                relay_service: Box::new(relay_handler.clone()),
            })
            .configure(routes::v1)
    });

    let (host, port) = app_config.server_addr();
    let bound_server = match app_config.tls_files() {
        Some((certificate_path, private_key_path)) => {
            let ssl_acceptor = setup_ssl_acceptor(
                certificate_path,
                private_key_path,
                app_config.ssl_pem.as_deref(),
            )?;
            info!("Listening on https://{}:{}", host, port);
            server
                .bind_openssl((host.as_str(), port), ssl_acceptor)
                .with_context(|| format!("failed to bind {host}:{port}"))?
        }
        None => {
            info!("Listening on http://{}:{}", host, port);
            server
                .bind((host.as_str(), port))
                .with_context(|| format!("failed to bind {host}:{port}"))?
        }
    };

    bound_server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
