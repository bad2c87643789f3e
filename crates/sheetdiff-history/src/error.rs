//! Error types for sheetdiff-history

use thiserror::Error;

/// Result type alias using [`StorageError`]
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Errors raised by the history store
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQLite failure
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Workbook could not be serialized
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored row could not be decoded
    #[error("corrupt record {id}: {reason}")]
    Corrupt {
        /// Id of the offending record
        id: String,
        /// What failed to decode
        reason: String,
    },

    /// The blocking task running a storage call failed
    #[error("storage task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// A previous storage call panicked while holding the connection
    #[error("storage connection lock poisoned")]
    Poisoned,
}
