//! WhatsApp webhook integration module
//!
//! ## Submodules
//!
//! - [`handler`] - Normalizes webhook events and relays text messages
//! - [`routes`] - HTTP endpoint handlers (verification and receiver)
//! - [`schemas`] - Incoming webhook payload structures
//! - [`outgoing_schemas`] - Request bodies for the send API
//! - [`client`] - WhatsApp API client for sending messages
//! - [`security`] - `X-Hub-Signature-256` verification

pub mod client;
pub mod handler;
pub mod outgoing_schemas;
pub mod routes;
pub mod schemas;
pub mod security;

pub use routes::{receive, verify};
