//! Error types for the record store

use socnet_common::{Collection, SocnetError};
use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by the store and the collection services
#[derive(Error, Debug)]
pub enum StoreError {
    /// Unique-key violation on a single-document insert
    #[error("Duplicate key in {collection}: {key}")]
    DuplicateKey { collection: Collection, key: String },

    /// Document has no string `_id`
    #[error("Document in {collection} has no string `_id` field")]
    MissingId { collection: Collection },

    #[error("No document with id '{key}' in {collection}")]
    NotFound { collection: Collection, key: String },

    /// A status referenced a user that does not exist
    #[error("User '{user_id}' does not exist; status '{status_id}' was not added")]
    OwnerNotFound { status_id: String, user_id: String },

    #[error("Invalid filter field: '{0}'")]
    InvalidField(String),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Corrupt document: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Domain(#[from] SocnetError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Whether the error is a unique-key violation
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, StoreError::DuplicateKey { .. })
    }
}
