//! Error types for the storage module.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for key-value store and snapshot operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key outside the allowed alphabet.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// IO error for file operations.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Snapshot decoding failure. Loading treats it as "start empty".
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Corrupt snapshot under '{key}': {reason}")]
    Corrupt { key: &'static str, reason: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SnapshotError {
    pub fn corrupt(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            key,
            reason: reason.into(),
        }
    }
}
