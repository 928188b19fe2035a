//! Error types for ECDB ingestion
//!
//! Messages are user-facing and say what to do next.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Error type for the ingestion pipeline
#[derive(Error, Debug)]
pub enum IngestError {
    /// Primary JSON release is missing
    #[error("Source document not found: '{}'. Check the --source path.", .0.display())]
    SourceNotFound(PathBuf),

    /// A text dump was requested but does not exist
    #[error("Text dump not found: '{}'. Fix the --text path or omit it to skip the flat-file pass.", .0.display())]
    TextDumpNotFound(PathBuf),

    /// Store does not exist (inspect only)
    #[error("Store not found: '{}'. Run 'ecdb-ingest run' to build it first.", .0.display())]
    StoreNotFound(PathBuf),

    /// Primary JSON release is malformed
    #[error("Failed to decode JSON release: {0}. The source document may be truncated or corrupted.")]
    Json(#[from] serde_json::Error),

    /// Store operation failed; the store must be rebuilt
    #[error("Store error: {0}. The store is incomplete; rerun the full ingestion.")]
    Database(#[from] rusqlite::Error),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// Invalid run parameters
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Common(#[from] ecdb_common::EcdbError),
}

impl IngestError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
