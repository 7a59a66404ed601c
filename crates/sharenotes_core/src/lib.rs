//! Core domain library for Shared Notes (ids, tokens, storage, config).

/// Fixed-width base62 token codec.
pub mod base62;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Environment mutation helpers for tests and tooling.
pub mod env;
/// Application error types (storage/domain).
pub mod error;
/// Data models for stored pastes.
pub mod models;
/// Snowflake id generation.
pub mod snowflake;
/// Paste storage contract and backends.
pub mod storage;
/// Token minting on top of the Snowflake generator.
pub mod token;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use constants::{DEFAULT_CONTENT_TYPE, DEFAULT_PORT};
pub use error::AppError;
pub use models::paste::StoredPaste;
pub use snowflake::{SnowflakeError, SnowflakeGenerator};
pub use storage::{open_storage, PasteStorage, StorageKind};
pub use token::{IssuedToken, TokenGenerator};
