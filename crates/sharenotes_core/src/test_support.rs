//! Shared test-only helpers for sharenotes_core.

use crate::snowflake::Clock;
use crate::storage::durable::RedbPasteStorage;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Clock pinned to a settable Unix-millisecond value. Clones share the value.
#[derive(Clone)]
pub(crate) struct ManualClock(Arc<AtomicU64>);

impl ManualClock {
    pub(crate) fn at(unix_millis: u64) -> Self {
        Self(Arc::new(AtomicU64::new(unix_millis)))
    }

    pub(crate) fn set(&self, unix_millis: u64) {
        self.0.store(unix_millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn unix_millis(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Creates a durable backend over a fresh temporary redb file.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing file.
///
/// # Panics
/// Panics if temp-dir creation or database initialization fails.
pub(crate) fn setup_temp_storage() -> (RedbPasteStorage, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("test.redb");
    let storage = RedbPasteStorage::open(db_path.to_str().expect("db path"), 0).expect("storage");
    (storage, temp_dir)
}
