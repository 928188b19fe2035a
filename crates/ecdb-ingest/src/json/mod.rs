//! JSON release ingestion
//!
//! [`EntrySource`] streams entries out of the release document and
//! [`flatten_entry`] turns each into store rows.

pub mod flatten;
pub mod payload;
pub mod source;

pub use flatten::{flatten_entry, FlattenedEntry, BASE_FIELDS, PROTEIN_KEY};
pub use payload::CategoryPayload;
pub use source::{Entry, EntrySource};
