//! redb table definitions for the durable backend.

use redb::TableDefinition;

/// Canonical paste rows keyed by token (`PasteRow`, bincode-encoded).
pub const PASTES: TableDefinition<&str, &[u8]> = TableDefinition::new("pastes");
/// Secondary unique key: Snowflake id to token.
pub const PASTES_BY_ID: TableDefinition<u64, &str> = TableDefinition::new("pastes_by_id");
/// Expiry index ordered by expiry millis then Snowflake id.
pub const PASTES_BY_EXPIRY: TableDefinition<(u64, u64), &str> =
    TableDefinition::new("pastes_by_expiry");
