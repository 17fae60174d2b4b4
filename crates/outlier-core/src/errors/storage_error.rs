//! Storage errors raised by the SQLite-backed collaborators.

use super::error_code::{self, OutlierErrorCode};

/// Storage-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("Corrupt record in {table}: {message}")]
    CorruptRecord { table: String, message: String },
}

impl OutlierErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::SqliteError { .. } => error_code::STORAGE_ERROR,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::CorruptRecord { .. } => error_code::CORRUPT_RECORD,
        }
    }
}
