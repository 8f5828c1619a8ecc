//! Storage errors.

use super::error_code::{self, OrbitErrorCode};

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    #[error("Migration v{version} failed: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

impl OrbitErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        error_code::STORAGE_ERROR
    }
}
