//! # API Module
//!
//! Business logic of the relay, independent of HTTP.
//!
//! ## Modules
//!
//! - [`messages`] - Outbound text and template messages
//! - [`relay`] - Fan-out of relay payloads to subscriber URLs
//! - [`routes`] - `/send` HTTP endpoints

pub mod messages;
pub mod relay;
pub mod routes;
