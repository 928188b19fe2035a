//! Ingestion run configuration

use crate::error::{IngestError, Result};
use crate::storage::DEFAULT_BATCH_SIZE;
use std::path::{Path, PathBuf};

/// Parameters of one ingestion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    /// JSON release
    pub source: PathBuf,

    /// Store to rebuild
    pub target: PathBuf,

    /// Optional flat-file dump (None = skip the text pass)
    pub text: Option<PathBuf>,

    /// Rows per write transaction
    pub batch_size: usize,

    /// Entry limit for sampling (None = ingest all)
    pub limit: Option<usize>,
}

impl IngestConfig {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            text: None,
            batch_size: DEFAULT_BATCH_SIZE,
            limit: None,
        }
    }

    /// Also ingest a flat-file dump
    pub fn with_text(mut self, text: impl Into<PathBuf>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set batch size
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Stop after `limit` JSON entries
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn text_path(&self) -> Option<&Path> {
        self.text.as_deref()
    }

    /// Reject parameters no run can use
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(IngestError::config("batch size must be at least 1"));
        }
        if self.limit == Some(0) {
            return Err(IngestError::config("entry limit must be at least 1; omit it to ingest everything"));
        }
        if self.source == self.target {
            return Err(IngestError::config(format!(
                "source and target are the same file: '{}'",
                self.source.display()
            )));
        }
        Ok(())
    }
}
