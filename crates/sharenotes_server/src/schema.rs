//! Wire schema for the paste API.

use crate::StoredPaste;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sharenotes_core::constants::DEFAULT_EXPIRES_IN_SECONDS;

fn default_expires_in_seconds() -> i64 {
    DEFAULT_EXPIRES_IN_SECONDS
}

/// Request payload for creating a paste.
#[derive(Debug, Deserialize)]
pub struct CreatePasteRequest {
    pub content: String,
    /// Omitted means the default TTL; an explicit `null` is rejected.
    #[serde(default = "default_expires_in_seconds")]
    pub expires_in_seconds: i64,
    /// Accepted for client compatibility; not stored.
    #[serde(default)]
    pub filename: Option<String>,
}

/// Paste metadata returned on create.
#[derive(Debug, Serialize)]
pub struct PasteResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub size_bytes: usize,
    pub content_type: String,
    pub sha256: String,
}

/// Paste metadata plus content, returned on get.
#[derive(Debug, Serialize)]
pub struct PasteWithContent {
    #[serde(flatten)]
    pub meta: PasteResponse,
    pub content: String,
}

impl From<&StoredPaste> for PasteResponse {
    fn from(paste: &StoredPaste) -> Self {
        Self {
            token: paste.token.clone(),
            expires_at: paste.expires_at,
            size_bytes: paste.size_bytes,
            content_type: paste.content_type.clone(),
            sha256: paste.sha256.clone(),
        }
    }
}

impl From<StoredPaste> for PasteWithContent {
    fn from(paste: StoredPaste) -> Self {
        Self {
            meta: PasteResponse::from(&paste),
            content: paste.content,
        }
    }
}
