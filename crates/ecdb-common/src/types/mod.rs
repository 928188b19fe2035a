//! Row model of the enzyme store
//!
//! One struct per table. All rows are append-only: the ingestion pipeline
//! creates them once and never updates them within a run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of `enzymes`, keyed by EC number
///
/// The counts are a snapshot of the source entry taken at ingest time. They
/// are not reconciled with `enzyme_facts` and may drift from it if facts are
/// later edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enzyme {
    pub ec_number: String,
    pub enzyme_id: Option<String>,
    pub recommended_name: Option<String>,
    pub systematic_name: Option<String>,
    pub reaction_summary: Option<String>,
    pub protein_count: i64,
    pub synonym_count: i64,
    pub reaction_count: i64,
    pub km_count: i64,
    pub turnover_count: i64,
    pub inhibitor_count: i64,
}

/// One row of `proteins`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protein {
    pub ec_number: String,
    pub protein_id: String,
    pub organism: Option<String>,
    pub comment: Option<String>,
    /// `;`-joined reference ids
    pub reference_ids: Option<String>,
    /// Source detail object, serialized verbatim
    pub raw_json: String,
}

/// One row of `enzyme_facts`: a single claim about an enzyme from the JSON release
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnzymeFact {
    pub ec_number: String,
    pub category: String,
    pub value: Option<String>,
    pub value_numeric_low: Option<f64>,
    pub value_numeric_high: Option<f64>,
    pub unit: Option<String>,
    pub context: Option<String>,
    pub comment: Option<String>,
    /// `;`-joined protein ids
    pub proteins: Option<String>,
    /// `;`-joined reference ids
    pub reference_ids: Option<String>,
    /// Source payload, serialized verbatim
    pub raw_json: String,
}

/// One row of `text_facts`: a completed field of the flat-file dump
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFact {
    pub ec_number: String,
    pub field_code: String,
    /// Human label for `field_code`; consumers display the code when absent
    pub field_name: Option<String>,
    pub value_raw: String,
    /// `value_raw` with markup stripped
    pub value_text: String,
    pub protein_tokens: Option<String>,
    pub reference_tokens: Option<String>,
    pub qualifiers: Option<String>,
}

impl TextFact {
    /// Label to show for this field: the human label, else the code itself
    pub fn display_name(&self) -> &str {
        self.field_name.as_deref().unwrap_or(&self.field_code)
    }
}

/// A name with its frequency, as listed in the run report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCount {
    pub name: String,
    pub count: u64,
}

/// Summary of one ingestion run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionReport {
    pub enzymes: u64,
    pub proteins: u64,
    pub facts: u64,
    pub text_facts: u64,
    /// Text facts whose EC number never appeared in the JSON pass
    pub orphan_text_facts: u64,
    pub top_categories: Vec<RankedCount>,
    pub top_text_fields: Vec<RankedCount>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl IngestionReport {
    /// Wall-clock duration of the run in milliseconds
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
