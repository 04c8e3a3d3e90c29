//! Error types for persistent storage.

use thiserror::Error;

/// Errors returned by storage backends.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The atomic rename of a freshly written file failed.
    #[error("failed to persist storage file: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// A value could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No platform data directory could be resolved.
    #[error("no local data directory available")]
    NoDataDir,
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
