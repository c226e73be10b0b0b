//! Typed configuration handed in by the host application.
//!
//! # Responsibility
//! - Describe where the customer database lives and how long SQLite may wait
//!   on a locked file.
//! - Describe the rolling log output.
//!
//! Both types deserialize from JSON so a host can pass them across the FFI
//! boundary as a single string.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Busy timeout applied when a config does not specify one.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

const DEFAULT_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_LOG_FILES: usize = 5;

/// Where the record store keeps its rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StoreLocation {
    /// SQLite database file; parent directories are created on open.
    File { path: PathBuf },
    /// Private in-memory database, discarded when the store is closed.
    Memory,
}

/// Record store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub location: StoreLocation,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl StoreConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::File { path: path.into() },
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::Memory,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

/// Rolling file log configuration.
///
/// `level` is one of `trace|debug|info|warn|error`; `log_dir` must be an
/// absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub log_dir: PathBuf,
    #[serde(default = "default_log_file_size_bytes")]
    pub max_file_size_bytes: u64,
    #[serde(default = "default_log_files")]
    pub max_files: usize,
}

impl LogConfig {
    pub fn new(level: impl Into<String>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            level: level.into(),
            log_dir: log_dir.into(),
            max_file_size_bytes: DEFAULT_LOG_FILE_SIZE_BYTES,
            max_files: DEFAULT_LOG_FILES,
        }
    }
}

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

fn default_log_file_size_bytes() -> u64 {
    DEFAULT_LOG_FILE_SIZE_BYTES
}

fn default_log_files() -> usize {
    DEFAULT_LOG_FILES
}
