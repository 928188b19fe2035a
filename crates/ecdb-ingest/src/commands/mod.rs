//! Subcommand implementations of the `ecdb-ingest` binary

pub mod inspect;
pub mod run;
