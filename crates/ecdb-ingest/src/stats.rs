//! Run statistics
//!
//! Tallies rows per table, facts per category and text facts per field code
//! while the passes run, then condenses them into an [`IngestionReport`].

use crate::json::FlattenedEntry;
use chrono::{DateTime, Utc};
use ecdb_common::{IngestionReport, RankedCount, TextFact};
use std::collections::{HashMap, HashSet};

/// Entries listed per ranking in the run report
pub const REPORT_TOP_N: usize = 10;

#[derive(Debug, Default)]
pub struct StatsCollector {
    enzymes: u64,
    proteins: u64,
    facts: u64,
    text_facts: u64,
    orphan_text_facts: u64,
    category_counts: HashMap<String, u64>,
    text_field_counts: HashMap<String, u64>,
    ec_numbers: HashSet<String>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_entry(&mut self, entry: &FlattenedEntry) {
        self.enzymes += 1;
        self.proteins += entry.proteins.len() as u64;
        self.facts += entry.facts.len() as u64;
        for fact in &entry.facts {
            *self.category_counts.entry(fact.category.clone()).or_default() += 1;
        }
        self.ec_numbers.insert(entry.enzyme.ec_number.clone());
    }

    /// Record a text fact; returns `false` when its EC number was not seen
    /// in the JSON pass
    pub fn record_text_fact(&mut self, fact: &TextFact) -> bool {
        self.text_facts += 1;
        *self.text_field_counts.entry(fact.field_code.clone()).or_default() += 1;

        let known = self.ec_numbers.contains(&fact.ec_number);
        if !known {
            self.orphan_text_facts += 1;
        }
        known
    }

    pub fn category_counts(&self) -> &HashMap<String, u64> {
        &self.category_counts
    }

    pub fn text_field_counts(&self) -> &HashMap<String, u64> {
        &self.text_field_counts
    }

    pub fn orphan_text_facts(&self) -> u64 {
        self.orphan_text_facts
    }

    pub fn into_report(self, started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> IngestionReport {
        IngestionReport {
            enzymes: self.enzymes,
            proteins: self.proteins,
            facts: self.facts,
            text_facts: self.text_facts,
            orphan_text_facts: self.orphan_text_facts,
            top_categories: top_n(&self.category_counts, REPORT_TOP_N),
            top_text_fields: top_n(&self.text_field_counts, REPORT_TOP_N),
            started_at,
            finished_at,
        }
    }
}

/// The `n` most frequent names, ties broken by name
pub fn top_n(counts: &HashMap<String, u64>, n: usize) -> Vec<RankedCount> {
    let mut ranked: Vec<RankedCount> = counts
        .iter()
        .map(|(name, count)| RankedCount {
            name: name.clone(),
            count: *count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(n);
    ranked
}
