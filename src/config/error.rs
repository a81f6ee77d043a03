use std::path::PathBuf;
use thiserror::Error;

use crate::core::parser::ParseError;

/// Errors that can occur while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Manifest or settings file does not exist.
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    /// Backup directory cannot be created or written to.
    #[error("Backup directory not writable: {0}")]
    BackupDirNotWritable(PathBuf),
    /// Failed to create backup file.
    #[error("Failed to create backup: {0}")]
    BackupFailed(String),
    /// Atomic write operation failed.
    #[error("Atomic write failed: {0}")]
    WriteFailed(String),
    /// Persisted customization record is structurally broken.
    #[error("Malformed customization record at byte {offset}: {message}")]
    InvalidRecord { offset: usize, message: String },
    /// Action manifest failed to parse.
    #[error("Manifest error: {0}")]
    Parse(#[from] ParseError),
    /// Generic I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
