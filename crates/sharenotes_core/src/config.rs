//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_DB_FILE_NAME, DEFAULT_MAX_CONTENT_BYTES, DEFAULT_PORT, DEFAULT_SWEEP_INTERVAL_SECS,
};
use crate::storage::StorageKind;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Runtime configuration for Shared Notes.
#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageKind,
    pub db_path: String,
    pub port: u16,
    /// Snowflake worker id. Kept signed so out-of-range values reach the
    /// generator and fail there with `InvalidWorkerId`.
    pub worker_id: i64,
    pub max_content_bytes: usize,
    /// Seconds between background sweeps; `0` disables the sweeper.
    pub sweep_interval_secs: u64,
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    env::current_dir().ok()
}

fn default_db_path() -> String {
    let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".cache")
        .join("sharenotes")
        .join(DEFAULT_DB_FILE_NAME)
        .to_string_lossy()
        .to_string()
}

/// Parse `name` with `FromStr`, warning and falling back to `default` when
/// the value is present but unparseable.
fn env_parse_or<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Invalid {}='{}'. Falling back to {}", name, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing
    /// or unparseable.
    pub fn from_env() -> Self {
        Self {
            storage: env_parse_or("STORAGE_TYPE", StorageKind::default()),
            db_path: env::var("DB_PATH")
                .map(expand_tilde)
                .unwrap_or_else(|_| default_db_path()),
            port: env_parse_or("PORT", DEFAULT_PORT),
            worker_id: env_parse_or("WORKER_ID", 0),
            max_content_bytes: env_parse_or("MAX_CONTENT_BYTES", DEFAULT_MAX_CONTENT_BYTES),
            sweep_interval_secs: env_parse_or("SWEEP_INTERVAL_SECS", DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }

    /// Interval for the background sweeper, or `None` when disabled.
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }
}
