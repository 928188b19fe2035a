//! Flatten one release entry into store rows
//!
//! Every entry yields one [`Enzyme`], one [`Protein`] per key of its
//! `protein` object, and one [`EnzymeFact`] per payload of every other
//! category.

use super::payload::{collection_len, field_text, join_tokens, CategoryPayload, VALUE_KEY};
use super::source::Entry;
use crate::error::Result;
use crate::value::{parse_value, ParsedValue};
use ecdb_common::{Enzyme, EnzymeFact, Protein};
use serde_json::{Map, Value};

/// Entry keys stored on the enzyme row rather than as facts
pub const BASE_FIELDS: [&str; 3] = ["id", "recommended_name", "systematic_name"];

/// Entry key holding the protein map
pub const PROTEIN_KEY: &str = "protein";

/// Rows produced from one entry
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenedEntry {
    pub enzyme: Enzyme,
    pub proteins: Vec<Protein>,
    pub facts: Vec<EnzymeFact>,
}

/// Build all rows for one entry
pub fn flatten_entry(ec_number: &str, entry: &Entry) -> Result<FlattenedEntry> {
    Ok(FlattenedEntry {
        enzyme: enzyme_row(ec_number, entry),
        proteins: protein_rows(ec_number, entry)?,
        facts: fact_rows(ec_number, entry)?,
    })
}

fn enzyme_row(ec_number: &str, entry: &Entry) -> Enzyme {
    Enzyme {
        ec_number: ec_number.to_string(),
        enzyme_id: field_text(entry, "id"),
        recommended_name: field_text(entry, "recommended_name"),
        systematic_name: field_text(entry, "systematic_name"),
        reaction_summary: reaction_summary(entry.get("reaction")),
        protein_count: collection_len(entry.get(PROTEIN_KEY)),
        synonym_count: collection_len(entry.get("synonyms")),
        reaction_count: collection_len(entry.get("reaction")),
        km_count: collection_len(entry.get("km_value")),
        turnover_count: collection_len(entry.get("turnover_number")),
        inhibitor_count: collection_len(entry.get("inhibitor")),
    }
}

/// Representative reaction: the first reaction's value, or the first
/// reaction itself when it is a plain string
fn reaction_summary(reactions: Option<&Value>) -> Option<String> {
    let first = match reactions? {
        Value::Array(items) => items.first()?,
        other => other,
    };
    match first {
        Value::Object(map) => field_text(map, VALUE_KEY),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn protein_rows(ec_number: &str, entry: &Entry) -> Result<Vec<Protein>> {
    let Some(Value::Object(proteins)) = entry.get(PROTEIN_KEY) else {
        return Ok(Vec::new());
    };

    proteins
        .iter()
        .map(|(protein_id, detail)| {
            let detail_map = detail.as_object();
            Ok(Protein {
                ec_number: ec_number.to_string(),
                protein_id: protein_id.clone(),
                organism: detail_map.and_then(|d| field_text(d, "organism")),
                comment: detail_map.and_then(|d| field_text(d, "comment")),
                reference_ids: detail_map.and_then(|d| join_tokens(d.get("references"))),
                raw_json: serde_json::to_string(detail)?,
            })
        })
        .collect()
}

fn fact_rows(ec_number: &str, entry: &Entry) -> Result<Vec<EnzymeFact>> {
    let mut facts = Vec::new();

    for (category, value) in entry {
        if category == PROTEIN_KEY || BASE_FIELDS.contains(&category.as_str()) {
            continue;
        }
        for payload in CategoryPayload::classify(value).into_objects() {
            facts.push(fact_row(ec_number, category, &payload)?);
        }
    }

    Ok(facts)
}

fn fact_row(ec_number: &str, category: &str, payload: &Map<String, Value>) -> Result<EnzymeFact> {
    let raw_value = payload.get(VALUE_KEY);

    let parsed = match raw_value {
        Some(Value::String(s)) if !s.trim().is_empty() => parse_value(s),
        Some(Value::Number(n)) => parse_value(&n.to_string()),
        _ => ParsedValue::default(),
    }
    .with_fallback_context(payload);

    Ok(EnzymeFact {
        ec_number: ec_number.to_string(),
        category: category.to_string(),
        value: field_text(payload, VALUE_KEY),
        value_numeric_low: parsed.low,
        value_numeric_high: parsed.high,
        unit: parsed.unit,
        context: parsed.context,
        comment: field_text(payload, "comment"),
        proteins: join_tokens(payload.get("proteins")),
        reference_ids: join_tokens(payload.get("references")),
        raw_json: serde_json::to_string(payload)?,
    })
}
