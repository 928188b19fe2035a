//! ECDB Ingest Library
//!
//! Builds a queryable SQLite store of enzyme knowledge from two inputs:
//!
//! - a **JSON release**: one object whose `data` member maps EC numbers to
//!   nested entry objects, streamed one entry at a time
//! - an optional **flat-file dump**: tab-delimited records of free-text
//!   fields with inline markup for proteins, references and qualifiers
//!
//! Every run rebuilds the store from scratch and returns an
//! [`IngestionReport`](ecdb_common::IngestionReport).
//!
//! # Example
//!
//! ```no_run
//! use ecdb_ingest::{pipeline, progress, IngestConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = IngestConfig::new("data/raw/brenda.json", "data/processed/brenda.db")
//!         .with_text("data/raw/brenda.txt");
//!     let report = pipeline::run(&config, &progress::hidden())?;
//!     println!("{} enzymes, {} facts", report.enzymes, report.facts);
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod commands;
pub mod config;
pub mod error;
pub mod flatfile;
pub mod input;
pub mod json;
pub mod markup;
pub mod pipeline;
pub mod progress;
pub mod stats;
pub mod storage;
pub mod value;

pub use config::IngestConfig;
pub use error::{IngestError, Result};
pub use markup::Markup;
pub use value::{parse_value, ParsedValue};
