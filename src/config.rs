//! Application configuration management with security considerations.
//!
//! All values come from environment variables and are read once at startup.
//! Credential and subscriber tables are JSON encoded and parsed eagerly so a
//! broken deployment fails before the server binds.
//!
//! # Security Notes
//! - Sensitive fields are clearly marked and should never be logged
//! - Production environments should use secure secret management systems

use crate::models::credential::CredentialStore;
use anyhow::Context;
use envconfig::Envconfig;
use std::{sync::OnceLock, time::Duration};

/// Application configuration with security-aware field management.
#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Deployment mode (NON-SENSITIVE)
    /// Values: "development", "production"
    #[envconfig(from = "MODE", default = "development")]
    pub mode: String,

    /// Host address for web server binding (NON-SENSITIVE)
    #[envconfig(from = "HOST", default = "127.0.0.1")]
    pub host: String,

    /// Port for plain HTTP binding (NON-SENSITIVE)
    #[envconfig(from = "PORT", default = "8000")]
    pub port: u16,

    /// Port for HTTPS binding in production (NON-SENSITIVE)
    /// Falls back to `PORT` when not set
    #[envconfig(from = "SSL_PORT")]
    pub ssl_port: Option<u16>,

    /// Path to SSL certificate file (NON-SENSITIVE)
    #[envconfig(from = "SSL_CERTIFICATE")]
    pub ssl_certificate: Option<String>,

    /// Path to SSL private key file (SENSITIVE PATH)
    /// Security: File should have 600 permissions
    #[envconfig(from = "SSL_KEY")]
    pub ssl_key: Option<String>,

    /// Path to the SSL certificate chain (NON-SENSITIVE)
    #[envconfig(from = "SSL_PEM")]
    pub ssl_pem: Option<String>,

    /// Comma separated list of allowed CORS origins (NON-SENSITIVE)
    #[envconfig(from = "ORIGINS")]
    pub origins: Option<String>,

    /// SENSITIVE: JSON list of sender credentials
    /// Example: `[{"phone_number_id":"1000","access_token":"...","phone_number":"+15550001111"}]`
    #[envconfig(from = "WHATSAPP_CREDENTIALS")]
    pub whatsapp_credentials: String,

    /// SENSITIVE: Token WhatsApp echoes back during webhook verification
    #[envconfig(from = "WHATSAPP_VERIFY_TOKEN")]
    pub whatsapp_verify_token: String,

    /// SENSITIVE: App secret used to check `X-Hub-Signature-256`
    /// Signature verification is disabled when not set
    #[envconfig(from = "WHATSAPP_APP_SECRET")]
    pub whatsapp_app_secret: Option<String>,

    /// Graph API base URL including version (NON-SENSITIVE)
    #[envconfig(from = "WHATSAPP_GRAPH_API_URL", default = "https://graph.facebook.com/v22.0")]
    pub whatsapp_graph_api_url: String,

    /// Timeout in seconds for each WhatsApp API call (NON-SENSITIVE)
    #[envconfig(from = "WHATSAPP_TIMEOUT_SECS", default = "30")]
    pub whatsapp_timeout_secs: u64,

    /// JSON list of subscriber URLs receiving relayed messages (NON-SENSITIVE)
    #[envconfig(from = "RELAY_URLS", default = "[]")]
    pub relay_urls: String,

    /// Timeout in seconds for each subscriber POST (NON-SENSITIVE)
    #[envconfig(from = "RELAY_TIMEOUT_SECS", default = "30")]
    pub relay_timeout_secs: u64,

    /// SENSITIVE: Logfire write token, console logging only when not set
    #[envconfig(from = "LOGFIRE_TOKEN")]
    pub logfire_token: Option<String>,
}

impl AppConfig {
    /// Checks if running in production environment
    pub fn is_prod(&self) -> bool {
        matches!(self.mode.to_lowercase().as_str(), "production" | "prod")
    }

    /// Builds the credential table from `WHATSAPP_CREDENTIALS`
    pub fn credential_store(&self) -> anyhow::Result<CredentialStore> {
        CredentialStore::from_json(&self.whatsapp_credentials)
    }

    /// Parses the subscriber URL list from `RELAY_URLS`
    pub fn subscriber_urls(&self) -> anyhow::Result<Vec<String>> {
        serde_json::from_str(&self.relay_urls)
            .context("RELAY_URLS must be a JSON list of URLs")
    }

    pub fn relay_timeout(&self) -> Duration {
        Duration::from_secs(self.relay_timeout_secs)
    }

    pub fn whatsapp_timeout(&self) -> Duration {
        Duration::from_secs(self.whatsapp_timeout_secs)
    }

    /// Allowed CORS origins, empty when `ORIGINS` is not set
    pub fn allowed_origins(&self) -> Vec<String> {
        self.origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Address the server binds to.
    ///
    /// Production with certificate and key configured binds the SSL port.
    pub fn server_addr(&self) -> (String, u16) {
        let port = if self.tls_files().is_some() {
            self.ssl_port.unwrap_or(self.port)
        } else {
            self.port
        };

        (self.host.clone(), port)
    }

    /// Certificate and key paths, only in production and only when both are set
    pub fn tls_files(&self) -> Option<(&str, &str)> {
        if !self.is_prod() {
            return None;
        }

        match (self.ssl_certificate.as_deref(), self.ssl_key.as_deref()) {
            (Some(cert), Some(key)) if !cert.is_empty() && !key.is_empty() => Some((cert, key)),
            _ => None,
        }
    }
}

/// Global application configuration, set once by [`init_config`].
pub static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Loads the configuration from the environment and validates the JSON tables.
pub fn init_config() -> anyhow::Result<&'static AppConfig> {
    let app_config = AppConfig::init_from_env()
        .context("Failed to load application configuration. Check environment variables")?;

    app_config.credential_store()?;
    app_config.subscriber_urls()?;

    Ok(APP_CONFIG.get_or_init(|| app_config))
}

#[cfg(test)]
pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        mode: "development".into(),
        host: "127.0.0.1".into(),
        port: 8000,
        ssl_port: None,
        ssl_certificate: None,
        ssl_key: None,
        ssl_pem: None,
        origins: None,
        whatsapp_credentials: "[]".into(),
        whatsapp_verify_token: "verify-secret".into(),
        whatsapp_app_secret: None,
        whatsapp_graph_api_url: "https://graph.facebook.com/v22.0".into(),
        relay_urls: "[]".into(),
        whatsapp_timeout_secs: 30,
        relay_timeout_secs: 30,
        logfire_token: None,
    }
}
