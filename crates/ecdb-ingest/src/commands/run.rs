//! `ecdb-ingest run` command implementation
//!
//! Rebuilds the store and prints the run report as JSON on stdout.

use crate::config::IngestConfig;
use crate::error::Result;
use crate::pipeline;
use crate::progress::create_spinner;
use ecdb_common::IngestionReport;

/// Rebuild the store described by `config`
pub fn run(config: &IngestConfig) -> Result<()> {
    let pb = create_spinner("Starting");
    let result = pipeline::run(config, &pb);
    pb.finish_and_clear();

    println!("{}", render_report(&result?)?);
    Ok(())
}

/// Pretty JSON form of a report
pub fn render_report(report: &IngestionReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
