//! Error types for ECDB

use thiserror::Error;

/// Result type alias for ECDB operations
pub type Result<T> = std::result::Result<T, EcdbError>;

/// Shared error type for ECDB
#[derive(Error, Debug)]
pub enum EcdbError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl EcdbError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
