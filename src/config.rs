//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

/// Cache storage configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Path of the database file. Parent directories are created on open.
    pub db_path: PathBuf,
    /// How long a write waits for the database lock before giving up.
    pub busy_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data/cache.db"),
            busy_timeout: Duration::from_secs(10),
        }
    }
}

impl CacheConfig {
    /// Build a config from environment variables, falling back to defaults.
    ///
    /// `ASSIST_CACHE_DB_PATH` — database file location.
    /// `ASSIST_CACHE_BUSY_TIMEOUT_MS` — write-lock wait in milliseconds.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let db_path = std::env::var("ASSIST_CACHE_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);
        let busy_timeout = std::env::var("ASSIST_CACHE_BUSY_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.busy_timeout);
        Self {
            db_path,
            busy_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.db_path, PathBuf::from("data/cache.db"));
        assert_eq!(config.busy_timeout, Duration::from_secs(10));
    }
}
