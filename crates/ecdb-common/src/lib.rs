//! ECDB Common Library
//!
//! Shared types, logging, and error handling for the ECDB workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`EcdbError`] and the [`Result`] alias
//! - **Logging**: tracing subscriber setup shared by every binary
//! - **Types**: the row model of the enzyme store (`enzymes`, `proteins`,
//!   `enzyme_facts`, `text_facts`) and the ingestion run report
//!
//! # Example
//!
//! ```no_run
//! use ecdb_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> ecdb_common::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{EcdbError, Result};
pub use types::{Enzyme, EnzymeFact, IngestionReport, Protein, RankedCount, TextFact};
