//! Flat-file dump ingestion
//!
//! The dump complements the JSON release with free-text fields. It is
//! optional; when present every completed field becomes one text fact.

pub mod labels;
pub mod scanner;

pub use labels::field_label;
pub use scanner::{classify_line, FieldScanner, Line, TextRecords};
