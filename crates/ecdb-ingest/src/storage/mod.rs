//! SQLite enzyme store
//!
//! Four tables, rebuilt from scratch on every run:
//!
//! - `enzymes`: one row per EC number
//! - `proteins`: protein records of each enzyme
//! - `enzyme_facts`: flattened claims from the JSON release
//! - `text_facts`: completed fields of the flat-file dump

pub mod schema;
pub mod summary;
pub mod writer;

pub use summary::StoreSummary;
pub use writer::{BatchWriter, LoadedStore, TableStats, WriteStats, DEFAULT_BATCH_SIZE};
