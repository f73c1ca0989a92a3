use thiserror::Error;

/// Storage-related errors raised by the persistence layer.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to access file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to create directory: {0}")]
    DirectoryError(String),

    #[error("Storage lock poisoned: {0}")]
    LockError(String),
}

impl StorageError {
    pub fn directory(msg: impl Into<String>) -> Self {
        StorageError::DirectoryError(msg.into())
    }

    pub fn lock(msg: impl Into<String>) -> Self {
        StorageError::LockError(msg.into())
    }
}
