//! Volatile paste storage in a process-local map.

use super::{PasteStorage, StorageKind};
use crate::{
    error::AppError,
    models::paste::StoredPaste,
    snowflake::{Clock, SystemClock},
    token::TokenGenerator,
};
use chrono::Utc;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// In-process backend. Contents are lost on restart.
///
/// Expired entries are evicted by the `get` that discovers them, or by
/// [`PasteStorage::cleanup_expired`].
pub struct InMemoryPasteStorage<C: Clock = SystemClock> {
    pastes: Mutex<HashMap<String, StoredPaste>>,
    tokens: TokenGenerator<C>,
}

impl InMemoryPasteStorage<SystemClock> {
    /// # Errors
    /// Returns [`AppError::IdGeneration`] for a worker id outside `0..=1023`.
    pub fn new(worker_id: i64) -> Result<Self, AppError> {
        Ok(Self::with_tokens(TokenGenerator::new(worker_id)?))
    }
}

impl<C: Clock> InMemoryPasteStorage<C> {
    pub fn with_tokens(tokens: TokenGenerator<C>) -> Self {
        Self {
            pastes: Mutex::new(HashMap::new()),
            tokens,
        }
    }

    /// Number of entries currently held, expired or not.
    pub fn len(&self) -> Result<usize, AppError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, StoredPaste>>, AppError> {
        self.pastes
            .lock()
            .map_err(|_| AppError::StorageMessage("In-memory paste map is poisoned".to_string()))
    }
}

impl<C: Clock> PasteStorage for InMemoryPasteStorage<C> {
    fn create(
        &self,
        content: String,
        ttl_seconds: u32,
        content_type: &str,
    ) -> Result<StoredPaste, AppError> {
        let issued = self.tokens.generate_token()?;
        let paste = StoredPaste::new(issued.token, content, content_type, ttl_seconds, Utc::now());

        let mut pastes = self.lock()?;
        match pastes.entry(paste.token.clone()) {
            Entry::Occupied(_) => {
                tracing::error!(
                    "Minted token '{}' already present; is worker id {} shared?",
                    paste.token,
                    self.tokens.worker_id()
                );
                Err(AppError::TokenCollision {
                    token: paste.token,
                    id: issued.id,
                })
            }
            Entry::Vacant(slot) => {
                slot.insert(paste.clone());
                tracing::debug!("Stored paste {} ({} bytes)", paste.token, paste.size_bytes);
                Ok(paste)
            }
        }
    }

    fn get(&self, token: &str) -> Result<Option<StoredPaste>, AppError> {
        let mut pastes = self.lock()?;
        let Some(paste) = pastes.get(token) else {
            return Ok(None);
        };
        if !paste.is_expired_at(Utc::now()) {
            return Ok(Some(paste.clone()));
        }

        pastes.remove(token);
        tracing::debug!("Evicted expired paste {} on read", token);
        Ok(None)
    }

    fn cleanup_expired(&self) -> Result<usize, AppError> {
        let now = Utc::now();
        let mut pastes = self.lock()?;
        let before = pastes.len();
        pastes.retain(|_, paste| !paste.is_expired_at(now));
        Ok(before - pastes.len())
    }

    fn kind(&self) -> StorageKind {
        StorageKind::Memory
    }
}
