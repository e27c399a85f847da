//! HTTP sidecar API for chat platform integrations.
//!
//! Axum-based JSON API with permissive CORS so that webhooks and chat
//! clients can call it from anywhere on the local network.

pub mod error;
pub mod handlers;
pub mod router;
