//! Durable paste storage backed by redb.
//!
//! Reads never delete: an expired row stays on disk, invisible to `get`,
//! until a sweep removes it through the expiry index.

pub mod tables;

use self::tables::{PASTES, PASTES_BY_EXPIRY, PASTES_BY_ID};
use super::{PasteStorage, StorageKind};
use crate::{
    error::AppError,
    models::paste::StoredPaste,
    snowflake::{Clock, SystemClock},
    token::TokenGenerator,
};
use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// On-disk row: the paste plus the Snowflake id its token encodes.
#[derive(Debug, Serialize, Deserialize)]
struct PasteRow {
    snowflake_id: u64,
    paste: StoredPaste,
}

fn deserialize_row(bytes: &[u8]) -> Result<PasteRow, AppError> {
    Ok(bincode::deserialize(bytes)?)
}

/// Expiry index key component. Pre-epoch instants clamp to 0.
fn expiry_millis(at: DateTime<Utc>) -> u64 {
    at.timestamp_millis().max(0) as u64
}

/// redb-backed paste store.
pub struct RedbPasteStorage<C: Clock = SystemClock> {
    db: Arc<redb::Database>,
    tokens: TokenGenerator<C>,
}

impl RedbPasteStorage<SystemClock> {
    /// Open (or create) the database at `path` and mint with `worker_id`.
    ///
    /// # Errors
    /// Returns an error for an invalid worker id, when the parent directory
    /// cannot be created, or when redb cannot open the file.
    pub fn open(path: &str, worker_id: i64) -> Result<Self, AppError> {
        let tokens = TokenGenerator::new(worker_id)?;
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent).map_err(|err| {
                AppError::StorageMessage(format!(
                    "Failed to create database directory '{}': {}",
                    parent.display(),
                    err
                ))
            })?;
        }
        let db = redb::Database::create(path)?;
        Self::from_shared(Arc::new(db), tokens)
    }
}

impl<C: Clock> RedbPasteStorage<C> {
    /// Build a backend over an already-open database, creating tables if
    /// they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn from_shared(
        db: Arc<redb::Database>,
        tokens: TokenGenerator<C>,
    ) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(PASTES)?;
        write_txn.open_table(PASTES_BY_ID)?;
        write_txn.open_table(PASTES_BY_EXPIRY)?;
        write_txn.commit()?;
        Ok(Self { db, tokens })
    }

    /// Shared handle to the underlying database.
    pub fn database(&self) -> Arc<redb::Database> {
        self.db.clone()
    }

    /// Token stored under a Snowflake id, including expired rows not yet swept.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn token_for_id(&self, snowflake_id: u64) -> Result<Option<String>, AppError> {
        let read_txn = self.db.begin_read()?;
        let by_id = read_txn.open_table(PASTES_BY_ID)?;
        Ok(by_id
            .get(snowflake_id)?
            .map(|token| token.value().to_string()))
    }
}

impl<C: Clock> PasteStorage for RedbPasteStorage<C> {
    fn create(
        &self,
        content: String,
        ttl_seconds: u32,
        content_type: &str,
    ) -> Result<StoredPaste, AppError> {
        let issued = self.tokens.generate_token()?;
        let row = PasteRow {
            snowflake_id: issued.id,
            paste: StoredPaste::new(
                issued.token.clone(),
                content,
                content_type,
                ttl_seconds,
                Utc::now(),
            ),
        };
        let encoded = bincode::serialize(&row)?;
        let expiry_key = (expiry_millis(row.paste.expires_at), issued.id);

        let write_txn = self.db.begin_write()?;
        {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut by_id = write_txn.open_table(PASTES_BY_ID)?;
            let mut by_expiry = write_txn.open_table(PASTES_BY_EXPIRY)?;

            if pastes.get(issued.token.as_str())?.is_some() || by_id.get(issued.id)?.is_some() {
                tracing::error!(
                    "Minted token '{}' (id {}) already stored; is worker id {} shared?",
                    issued.token,
                    issued.id,
                    self.tokens.worker_id()
                );
                return Err(AppError::TokenCollision {
                    token: issued.token,
                    id: issued.id,
                });
            }

            pastes.insert(issued.token.as_str(), encoded.as_slice())?;
            by_id.insert(issued.id, issued.token.as_str())?;
            by_expiry.insert(expiry_key, issued.token.as_str())?;
        }
        write_txn.commit()?;

        tracing::debug!(
            "Stored paste {} ({} bytes)",
            row.paste.token,
            row.paste.size_bytes
        );
        Ok(row.paste)
    }

    fn get(&self, token: &str) -> Result<Option<StoredPaste>, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        let Some(guard) = pastes.get(token)? else {
            return Ok(None);
        };
        let row = deserialize_row(guard.value())?;
        if row.paste.is_expired_at(Utc::now()) {
            return Ok(None);
        }
        Ok(Some(row.paste))
    }

    fn cleanup_expired(&self) -> Result<usize, AppError> {
        // Stored timestamps are whole milliseconds, so `expires_at <= now`
        // holds exactly for index keys at or below the floored cutoff.
        let cutoff = expiry_millis(Utc::now());

        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut by_id = write_txn.open_table(PASTES_BY_ID)?;
            let mut by_expiry = write_txn.open_table(PASTES_BY_EXPIRY)?;

            let due: Vec<((u64, u64), String)> = by_expiry
                .range(..=(cutoff, u64::MAX))?
                .map(|item| item.map(|(key, token)| (key.value(), token.value().to_string())))
                .collect::<Result<_, redb::StorageError>>()?;

            let mut removed = 0;
            for (key, token) in due {
                by_expiry.remove(key)?;
                by_id.remove(key.1)?;
                if pastes.remove(token.as_str())?.is_some() {
                    removed += 1;
                }
            }
            removed
        };
        write_txn.commit()?;
        Ok(removed)
    }

    fn kind(&self) -> StorageKind {
        StorageKind::Durable
    }
}
