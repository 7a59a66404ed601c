//! Paste storage contract and its backends.

/// Durable backend on an embedded redb file.
pub mod durable;
/// Volatile in-process backend.
pub mod memory;

pub use durable::RedbPasteStorage;
pub use memory::InMemoryPasteStorage;

use crate::{config::Config, error::AppError, models::paste::StoredPaste};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Capability shared by every paste backend.
///
/// Expiry is a pure function of wall-clock time: a record with
/// `now >= expires_at` is never returned, whether or not it has been
/// physically removed yet.
pub trait PasteStorage: Send + Sync {
    /// Mint a token and persist a new paste expiring `ttl_seconds` from now.
    ///
    /// Content and TTL bounds are the caller's responsibility.
    ///
    /// # Errors
    /// Returns id-generation, token-collision, or persistence errors.
    fn create(
        &self,
        content: String,
        ttl_seconds: u32,
        content_type: &str,
    ) -> Result<StoredPaste, AppError>;

    /// Look up a paste by exact token.
    ///
    /// # Returns
    /// `Ok(None)` when the token is unknown or the paste has expired.
    ///
    /// # Errors
    /// Returns persistence errors only; absence is not an error.
    fn get(&self, token: &str) -> Result<Option<StoredPaste>, AppError>;

    /// Delete every paste with `expires_at <= now`.
    ///
    /// # Returns
    /// Number of records removed (0 when nothing was due).
    fn cleanup_expired(&self) -> Result<usize, AppError>;

    fn kind(&self) -> StorageKind;
}

/// Backend selector parsed from `STORAGE_TYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKind {
    Memory,
    #[default]
    Durable,
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "redb" | "durable" | "sql" => Ok(Self::Durable),
            other => Err(format!("unknown storage type '{}'", other)),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::Durable => f.write_str("redb"),
        }
    }
}

/// Open the backend selected by `config`.
///
/// # Errors
/// Returns [`AppError::IdGeneration`] for an invalid worker id, or a database
/// error when the durable store cannot be opened.
pub fn open_storage(config: &Config) -> Result<Arc<dyn PasteStorage>, AppError> {
    let storage: Arc<dyn PasteStorage> = match config.storage {
        StorageKind::Memory => Arc::new(InMemoryPasteStorage::new(config.worker_id)?),
        StorageKind::Durable => {
            Arc::new(RedbPasteStorage::open(&config.db_path, config.worker_id)?)
        }
    };
    tracing::info!(
        "Opened {} paste storage (worker id {})",
        storage.kind(),
        config.worker_id
    );
    Ok(storage)
}

#[cfg(test)]
mod tests;
