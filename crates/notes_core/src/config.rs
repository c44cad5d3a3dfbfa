//! Process configuration read from the environment.
//!
//! # Responsibility
//! - Resolve the database location and logging settings for entry points.
//!
//! # Invariants
//! - `log_level` is always one of the canonical level names.
//! - An absent `db_path` means storage is not configured; entry points
//!   refuse to run rather than fall back to a throwaway database.

use crate::logging::{default_log_level, normalize_level, LoggingError};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "NOTES_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "NOTES_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "NOTES_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite database file; `None` when not configured.
    pub db_path: Option<PathBuf>,
    pub log_level: &'static str,
    /// Rolling log directory; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Loads configuration from `NOTES_*` environment variables.
    pub fn from_env() -> Result<Self, LoggingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LoggingError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let log_level = match read(ENV_LOG_LEVEL) {
            Some(level) => normalize_level(&level)?,
            None => default_log_level(),
        };

        Ok(Self {
            db_path: read(ENV_DB_PATH).map(PathBuf::from),
            log_level,
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use crate::logging::{default_log_level, LoggingError};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = CoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.log_level, default_log_level());
    }

    #[test]
    fn values_are_read_and_normalized() {
        let config = CoreConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "/var/lib/notes/notes.db"),
            (ENV_LOG_LEVEL, "WARNING"),
            (ENV_LOG_DIR, "/var/log/notes"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, Some(PathBuf::from("/var/lib/notes/notes.db")));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/notes")));
    }

    #[test]
    fn blank_values_count_as_unset_and_bad_levels_fail() {
        let config = CoreConfig::from_lookup(lookup(&[(ENV_DB_PATH, "  ")])).unwrap();
        assert_eq!(config.db_path, None);

        let err = CoreConfig::from_lookup(lookup(&[(ENV_LOG_LEVEL, "loud")])).unwrap_err();
        assert!(matches!(err, LoggingError::UnsupportedLevel(_)));
    }
}
