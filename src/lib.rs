//! filebench - file write/read-back throughput benchmark
//!
//! Writes a configurable number of fixed-size random files into one or
//! more directories, reads every file back, and reports periodic and
//! final throughput for both phases. Each directory (or each worker on a
//! shared directory) is benchmarked by its own blocking worker thread.

use std::fmt;

pub mod bench;
pub mod cli;
pub mod config;
pub mod io;
pub mod models;
pub mod report;
pub mod util;

// Common error types
#[derive(Debug)]
pub enum FileBenchError {
    /// I/O operation failed
    IoError(std::io::Error),
    /// Configuration validation or parsing error
    ConfigError(String),
    /// Target directory could not be created
    DirectoryCreate(String),
    /// Target directory could not be listed
    DirectoryList(String),
    /// Worker thread failed or panicked
    WorkerError(String),
    /// Report serialization error
    SerializationError(String),
}

impl fmt::Display for FileBenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileBenchError::IoError(err) => write!(f, "I/O error: {}", err),
            FileBenchError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            FileBenchError::DirectoryCreate(msg) => {
                write!(f, "Failed to create directory: {}", msg)
            }
            FileBenchError::DirectoryList(msg) => write!(f, "Failed to list directory: {}", msg),
            FileBenchError::WorkerError(msg) => write!(f, "Worker error: {}", msg),
            FileBenchError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for FileBenchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileBenchError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FileBenchError {
    fn from(err: std::io::Error) -> Self {
        FileBenchError::IoError(err)
    }
}

impl From<serde_json::Error> for FileBenchError {
    fn from(err: serde_json::Error) -> Self {
        FileBenchError::SerializationError(format!("JSON serialization error: {}", err))
    }
}

impl From<toml::de::Error> for FileBenchError {
    fn from(err: toml::de::Error) -> Self {
        FileBenchError::ConfigError(format!("TOML parsing error: {}", err))
    }
}

/// Result type alias for filebench operations
pub type Result<T> = std::result::Result<T, FileBenchError>;

// Common types and constants
pub const APP_NAME: &str = "filebench";
pub const FILE_PREFIX: &str = "file_";
pub const FILE_EXTENSION: &str = "dat";
/// A checkpoint report is emitted after every this-many files or entries.
pub const CHECKPOINT_INTERVAL: u64 = 5;
pub const MAX_WORKERS_PER_DIRECTORY: usize = 64;
