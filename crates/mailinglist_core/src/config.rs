//! Runtime configuration for embedding the store.
//!
//! # Responsibility
//! - Collect the knobs a host process needs to open the store and start
//!   logging.
//!
//! # Invariants
//! - `Default` yields a usable configuration (file `mailinglist.db` in the
//!   working directory, 5 s busy timeout, build-mode log level, stderr logs).

use crate::db::{self, DbResult, DEFAULT_BUSY_TIMEOUT};
use crate::logging::default_log_level;
use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DB_FILE_NAME: &str = "mailinglist.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub busy_timeout_ms: u64,
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT.as_millis() as u64,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Opens `db_path` with the configured busy timeout.
    pub fn open_db(&self) -> DbResult<Connection> {
        db::open_db_with_timeout(&self.db_path, self.busy_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::StoreConfig;
    use std::time::Duration;

    #[test]
    fn default_config_uses_five_second_busy_timeout() {
        let config = StoreConfig::default();
        assert_eq!(config.busy_timeout(), Duration::from_secs(5));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn open_db_creates_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            db_path: dir.path().join("list.db"),
            busy_timeout_ms: 250,
            ..StoreConfig::default()
        };

        config.open_db().unwrap();
        assert!(config.db_path.exists());
        assert_eq!(config.busy_timeout(), Duration::from_millis(250));
    }
}
