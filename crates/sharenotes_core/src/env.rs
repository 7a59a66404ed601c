//! Process-global environment mutation helpers.

use std::sync::{Mutex, OnceLock};

/// Return the global lock used to serialize environment mutations in tests.
pub fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

// Toolchains differ on whether env mutation APIs are `unsafe`.
#[allow(unused_unsafe)]
fn set_env_var(key: &str, value: &str) {
    // SAFETY: Callers must serialize mutation when test threads may run in parallel.
    unsafe {
        std::env::set_var(key, value);
    }
}

#[allow(unused_unsafe)]
fn remove_env_var(key: &str) {
    // SAFETY: Callers must serialize mutation when test threads may run in parallel.
    unsafe {
        std::env::remove_var(key);
    }
}

/// Restores an environment variable value on drop.
pub struct EnvGuard {
    key: String,
    previous: Option<String>,
}

impl EnvGuard {
    /// Set `key=value` for the lifetime of the guard.
    pub fn set(key: &str, value: &str) -> Self {
        let previous = std::env::var(key).ok();
        set_env_var(key, value);
        Self {
            key: key.to_string(),
            previous,
        }
    }

    /// Remove `key` for the lifetime of the guard.
    pub fn remove(key: &str) -> Self {
        let previous = std::env::var(key).ok();
        remove_env_var(key);
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.previous.as_deref() {
            Some(previous) => set_env_var(&self.key, previous),
            None => remove_env_var(&self.key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{env_lock, EnvGuard};

    #[test]
    fn env_guard_restores_previous_value() {
        let _lock = env_lock().lock().expect("env lock");
        let key = "SHARENOTES_TEST_ENV_GUARD_RESTORE";
        let _baseline = EnvGuard::set(key, "before");
        {
            let _override = EnvGuard::set(key, "after");
            assert_eq!(std::env::var(key).ok().as_deref(), Some("after"));
        }
        assert_eq!(std::env::var(key).ok().as_deref(), Some("before"));
    }

    #[test]
    fn env_guard_remove_restores_missing_value() {
        let _lock = env_lock().lock().expect("env lock");
        let key = "SHARENOTES_TEST_ENV_GUARD_REMOVE";
        {
            let _removed = EnvGuard::remove(key);
            assert!(std::env::var(key).is_err());
        }
        assert!(std::env::var(key).is_err());
    }
}
