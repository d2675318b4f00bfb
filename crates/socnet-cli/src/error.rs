//! Error types for the socnet CLI
//!
//! Every variant carries a message a user can act on.

use socnet_ingest::ImportError;
use socnet_store::StoreError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Import input file is missing
    #[error("File not found: '{0}'. Verify the file path exists and you have read permissions.")]
    FileNotFound(String),

    #[error("User '{0}' does not exist. Use 'socnet user add' to create it.")]
    UserNotFound(String),

    #[error("Status '{0}' does not exist.")]
    StatusNotFound(String),

    #[error("{collection} already contains id '{key}'. Use the update command to change it.")]
    AlreadyExists { collection: String, key: String },

    /// Parallel import finished but some slices were not written
    #[error("Import incomplete: {0} worker(s) failed. Re-run the import; existing rows are skipped as duplicates.")]
    ImportIncomplete(usize),

    /// Any other import failure
    #[error("Import failed: {0}")]
    Import(ImportError),

    /// Database operation failed
    #[error("Database error: {0}. Check the --db path and file permissions.")]
    Store(StoreError),

    #[error("Configuration error: {0}. Check your environment variables or .env file.")]
    Config(String),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// JSON output failed
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { collection, key } => Self::AlreadyExists {
                collection: collection.to_string(),
                key,
            },
            StoreError::OwnerNotFound { user_id, .. } => Self::UserNotFound(user_id),
            StoreError::NotFound { collection, key } => match collection {
                socnet_common::Collection::Users => Self::UserNotFound(key),
                socnet_common::Collection::Statuses => Self::StatusNotFound(key),
            },
            other => Self::Store(other),
        }
    }
}

impl From<ImportError> for CliError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => Self::FileNotFound(path.display().to_string()),
            ImportError::Store(e) => Self::Store(e),
            other => Self::Import(other),
        }
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        Self::Config(err.to_string())
    }
}
