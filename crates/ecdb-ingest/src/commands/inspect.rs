//! `ecdb-ingest inspect` command implementation
//!
//! Shows row counts and the leading categories of an existing store.

use crate::error::Result;
use crate::storage::StoreSummary;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use ecdb_common::RankedCount;
use std::path::Path;

/// Print a summary of the store at `target`
pub fn run(target: &Path, top: usize) -> Result<()> {
    let summary = StoreSummary::open(target, top)?;
    print!("{}", render_summary(&summary));
    Ok(())
}

/// Format a summary as tables
pub fn render_summary(summary: &StoreSummary) -> String {
    let mut table = new_table(&["Table", "Rows"]);
    for (name, rows) in &summary.table_counts {
        table.add_row(vec![name.clone(), rows.to_string()]);
    }

    let mut out = format!("{}\n", table);
    out.push_str(&format!(
        "\nTop categories\n{}\n",
        ranked_table("Category", &summary.top_categories)
    ));
    out.push_str(&format!(
        "\nTop text fields\n{}\n",
        ranked_table("Field code", &summary.top_text_fields)
    ));

    if summary.orphan_text_ec_numbers > 0 {
        out.push_str(&format!(
            "\n{} EC number(s) in text_facts have no enzymes row\n",
            summary.orphan_text_ec_numbers
        ));
    }
    out
}

fn ranked_table(label: &str, rows: &[RankedCount]) -> Table {
    let mut table = new_table(&[label, "Count"]);
    for row in rows {
        table.add_row(vec![row.name.clone(), row.count.to_string()]);
    }
    table
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(header.to_vec());
    table
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_summary() {
        let summary = StoreSummary {
            table_counts: vec![("enzymes".to_string(), 2), ("text_facts".to_string(), 5)],
            top_categories: vec![RankedCount {
                name: "km_value".to_string(),
                count: 4,
            }],
            top_text_fields: Vec::new(),
            orphan_text_ec_numbers: 1,
        };

        let rendered = render_summary(&summary);
        assert!(rendered.contains("enzymes"));
        assert!(rendered.contains("km_value"));
        assert!(rendered.contains("Field code"));
        assert!(rendered.contains("1 EC number(s)"));
    }
}
