//! Full ingestion run
//!
//! 1. Check that every input exists; nothing is touched otherwise.
//! 2. Rebuild the store.
//! 3. JSON pass: stream entries, flatten each, buffer rows.
//! 4. Text pass (optional): scan the dump, buffer text facts.
//! 5. Flush the remainder, build indexes, report.
//!
//! Any error aborts the run and leaves an incomplete store behind; the next
//! run deletes it.

use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use crate::flatfile::TextRecords;
use crate::json::{flatten_entry, EntrySource};
use crate::progress;
use crate::stats::StatsCollector;
use crate::storage::BatchWriter;
use chrono::Utc;
use ecdb_common::IngestionReport;
use indicatif::ProgressBar;
use tracing::{debug, info, warn};

/// Run one ingestion, reporting progress on `pb`
pub fn run(config: &IngestConfig, pb: &ProgressBar) -> Result<IngestionReport> {
    config.validate()?;
    check_inputs(config)?;

    let started_at = Utc::now();
    info!(
        source = %config.source.display(),
        target = %config.target.display(),
        text = ?config.text,
        batch_size = config.batch_size,
        limit = ?config.limit,
        "Starting ingestion"
    );

    let mut writer = BatchWriter::create(&config.target, config.batch_size)?;
    let mut stats = StatsCollector::new();

    progress::start_pass(pb, "Reading JSON release");
    let mut source = EntrySource::open(&config.source)?;
    if let Some(limit) = config.limit {
        source = source.with_limit(limit);
    }
    let entries = source.for_each(|ec_number, entry| {
        let flat = flatten_entry(&ec_number, &entry)?;
        stats.record_entry(&flat);

        writer.push_enzyme(flat.enzyme)?;
        for protein in flat.proteins {
            writer.push_protein(protein)?;
        }
        for fact in flat.facts {
            writer.push_fact(fact)?;
        }
        pb.inc(1);
        Ok(())
    })?;
    writer.flush_all()?;
    info!(entries, "JSON pass complete");

    if let Some(text_path) = config.text_path() {
        progress::start_pass(pb, "Scanning text dump");
        let mut fields = 0u64;
        for fact in TextRecords::open(text_path)? {
            let fact = fact?;
            if !stats.record_text_fact(&fact) {
                debug!(ec_number = %fact.ec_number, field_code = %fact.field_code, "Text fact has no JSON entry");
            }
            writer.push_text_fact(fact)?;
            fields += 1;
            pb.inc(1);
        }
        info!(fields, "Text pass complete");
    }

    let store = writer.finish()?;
    debug!(stats = ?store.stats, "Store loaded");

    if stats.orphan_text_facts() > 0 {
        warn!(
            orphan_text_facts = stats.orphan_text_facts(),
            "Text facts reference EC numbers absent from the JSON release"
        );
    }

    let report = stats.into_report(started_at, Utc::now());
    info!(
        enzymes = report.enzymes,
        proteins = report.proteins,
        facts = report.facts,
        text_facts = report.text_facts,
        duration_ms = report.duration_ms(),
        "Ingestion complete"
    );
    Ok(report)
}

fn check_inputs(config: &IngestConfig) -> Result<()> {
    if !config.source.is_file() {
        return Err(IngestError::SourceNotFound(config.source.clone()));
    }
    if let Some(text) = config.text_path() {
        if !text.is_file() {
            return Err(IngestError::TextDumpNotFound(text.to_path_buf()));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::path::Path;

    const RELEASE: &str = r#"{"data": {
        "1.1.1.1": {"id": "1.1.1.1", "km_value": [{"value": "0.5 mM"}]},
        "2.2.2.2": {"id": "2.2.2.2", "inhibitor": ["EDTA", "Zn2+"]}
    }}"#;

    #[test]
    fn test_missing_text_dump_leaves_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("release.json");
        let target = dir.path().join("store.db");
        std::fs::write(&source, RELEASE).unwrap();
        std::fs::write(&target, b"previous store").unwrap();

        let config = IngestConfig::new(&source, &target).with_text(dir.path().join("missing.txt"));
        let err = run(&config, &progress::hidden()).unwrap_err();

        assert!(matches!(err, IngestError::TextDumpNotFound(_)));
        assert_eq!(std::fs::read(&target).unwrap(), b"previous store");
    }

    #[test]
    fn test_missing_source() {
        let config = IngestConfig::new("/nonexistent/release.json", "/nonexistent/store.db");
        let err = run(&config, &progress::hidden()).unwrap_err();
        assert!(matches!(err, IngestError::SourceNotFound(ref p) if p == Path::new("/nonexistent/release.json")));
    }

    #[test]
    fn test_limit_samples_entries() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("release.json");
        std::fs::write(&source, RELEASE).unwrap();

        let config = IngestConfig::new(&source, dir.path().join("store.db")).with_limit(1);
        let report = run(&config, &progress::hidden()).unwrap();

        assert_eq!(report.enzymes, 1);
        assert_eq!(report.facts, 1);
        assert_eq!(report.top_categories[0].name, "km_value");
    }
}
