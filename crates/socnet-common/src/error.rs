//! Error types shared across the workspace

use thiserror::Error;

/// Result type alias for common operations
pub type Result<T> = std::result::Result<T, SocnetError>;

/// Main error type for shared domain code
#[derive(Error, Debug)]
pub enum SocnetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Value is not a document: {0}")]
    NotADocument(String),
}
