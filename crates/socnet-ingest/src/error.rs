//! Error types for the import pipeline
//!
//! Only failures that stop a whole call live here. Rows that cannot be
//! imported are reported through [`crate::ImportReport`] instead.

use socnet_store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for import operations
pub type Result<T> = std::result::Result<T, ImportError>;

#[derive(Error, Debug)]
pub enum ImportError {
    /// Input file does not exist; nothing was written
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Chunk size must be greater than 0")]
    InvalidChunkSize,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A coordinator task died before any worker was started
    #[error("Import task failed: {0}")]
    Task(String),
}
