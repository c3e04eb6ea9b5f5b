//! Store and logging configuration.
//!
//! Both structs deserialize with defaults so a host application can embed
//! them in its own settings file.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Where and how the embedded store is opened.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file. `None` keeps the store in memory.
    pub db_path: Option<PathBuf>,
    /// SQLite busy timeout applied to file connections.
    pub busy_timeout_ms: u64,
}

impl StoreConfig {
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            db_path: Some(path.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// Rolling file log settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    /// One of `trace|debug|info|warn|error`, case-insensitive.
    #[serde(default = "default_level_string")]
    pub level: String,
    /// Absolute directory for log files.
    pub log_dir: PathBuf,
}

impl LogConfig {
    /// Uses the build-mode default level.
    pub fn new(log_dir: impl AsRef<Path>) -> Self {
        Self {
            level: default_level_string(),
            log_dir: log_dir.as_ref().to_path_buf(),
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }
}

fn default_level_string() -> String {
    default_log_level().to_string()
}
