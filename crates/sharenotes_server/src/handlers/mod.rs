//! HTTP request handlers.

/// Liveness probe.
pub mod health;
/// Paste endpoints.
pub mod paste;
