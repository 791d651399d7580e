use thiserror::Error;

/// Errors that can occur when reading or writing local storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key contains characters that cannot be mapped to a storage slot.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The backing medium could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The storage is temporarily unavailable (quota exceeded, disabled, ...).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
