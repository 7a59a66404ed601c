//! Storage contract tests, run against both backends.

use super::*;
use crate::constants::DEFAULT_CONTENT_TYPE;
use crate::test_support::{setup_temp_storage, ManualClock};
use chrono::{Duration, Utc};
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

fn memory_storage() -> InMemoryPasteStorage {
    InMemoryPasteStorage::new(0).expect("memory storage")
}

/// Both backends, with the temp dir backing the durable one.
fn each_backend() -> (Vec<Box<dyn PasteStorage>>, TempDir) {
    let (durable, temp) = setup_temp_storage();
    (vec![Box::new(memory_storage()), Box::new(durable)], temp)
}

fn create_text(storage: &dyn PasteStorage, content: &str, ttl_seconds: u32) -> StoredPaste {
    storage
        .create(content.to_string(), ttl_seconds, DEFAULT_CONTENT_TYPE)
        .expect("create")
}
