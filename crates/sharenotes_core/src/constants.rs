//! Shared constants used across Shared Notes crates.

/// Default API port.
pub const DEFAULT_PORT: u16 = 38412;

/// Content type stamped on pastes created through the API.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Smallest accepted paste body, in UTF-8 bytes.
pub const MIN_CONTENT_BYTES: usize = 1;
/// Default upper bound for paste bodies, in UTF-8 bytes.
pub const DEFAULT_MAX_CONTENT_BYTES: usize = 64 * 1024;

/// Shortest TTL the API accepts.
pub const MIN_EXPIRES_IN_SECONDS: i64 = 60;
/// Longest TTL the API accepts (one week).
pub const MAX_EXPIRES_IN_SECONDS: i64 = 7 * 24 * 60 * 60;
/// TTL applied when a create request omits one.
pub const DEFAULT_EXPIRES_IN_SECONDS: i64 = 24 * 60 * 60;

/// Default interval between background expiry sweeps.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// File name of the redb database under the default cache directory.
pub const DEFAULT_DB_FILE_NAME: &str = "pastes.redb";
