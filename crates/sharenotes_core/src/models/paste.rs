//! Stored paste records.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A paste as persisted by every storage backend.
///
/// Records are immutable once created; they only ever leave storage through
/// lazy eviction or an expiry sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPaste {
    pub token: String,
    pub content: String,
    pub content_type: String,
    /// UTF-8 byte length of `content`.
    pub size_bytes: usize,
    /// Lowercase hex SHA-256 of the UTF-8 bytes of `content`.
    pub sha256: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl StoredPaste {
    /// Build a record for `content`, stamping `created_at = now` and
    /// `expires_at = now + ttl_seconds`.
    ///
    /// `now` is truncated to whole milliseconds so the durable backend's
    /// millisecond expiry index agrees exactly with the stored timestamps.
    pub fn new(
        token: String,
        content: String,
        content_type: &str,
        ttl_seconds: u32,
        now: DateTime<Utc>,
    ) -> Self {
        let created_at = now.trunc_subsecs(3);
        Self {
            token,
            size_bytes: content.len(),
            sha256: sha256_hex(&content),
            content,
            content_type: content_type.to_string(),
            created_at,
            expires_at: created_at + Duration::seconds(i64::from(ttl_seconds)),
        }
    }

    /// Whether the paste is past its expiry at `now` (`now >= expires_at`).
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Strong entity tag derived from the content digest.
    pub fn etag(&self) -> String {
        format!("\"{}\"", self.sha256)
    }
}

/// Lowercase hex SHA-256 digest of the UTF-8 bytes of `content`.
pub fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
