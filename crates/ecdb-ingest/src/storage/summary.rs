//! Read-only summary of an existing store

use super::schema::TABLES;
use crate::error::{IngestError, Result};
use ecdb_common::RankedCount;
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use std::path::Path;

/// Row counts and leading categories of a store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    /// `(table, rows)` in load order
    pub table_counts: Vec<(String, u64)>,
    pub top_categories: Vec<RankedCount>,
    pub top_text_fields: Vec<RankedCount>,
    /// Distinct EC numbers in `text_facts` with no `enzymes` row
    pub orphan_text_ec_numbers: u64,
}

impl StoreSummary {
    /// Open the store at `path` read-only and summarize it
    pub fn open(path: &Path, top: usize) -> Result<Self> {
        if !path.exists() {
            return Err(IngestError::StoreNotFound(path.to_path_buf()));
        }
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Self::load(&conn, top)
    }

    pub fn load(conn: &Connection, top: usize) -> Result<Self> {
        let table_counts = TABLES
            .iter()
            .map(|table| -> Result<(String, u64)> {
                let rows: i64 =
                    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
                Ok((table.to_string(), u64::try_from(rows).unwrap_or(0)))
            })
            .collect::<Result<Vec<_>>>()?;

        let top_categories = ranked(
            conn,
            "SELECT category, COUNT(*) AS n FROM enzyme_facts GROUP BY category ORDER BY n DESC, category ASC LIMIT ?1",
            top,
        )?;
        let top_text_fields = ranked(
            conn,
            "SELECT field_code, COUNT(*) AS n FROM text_facts GROUP BY field_code ORDER BY n DESC, field_code ASC LIMIT ?1",
            top,
        )?;

        let orphans: i64 = conn.query_row(
            r#"
            SELECT COUNT(DISTINCT t.ec_number)
            FROM text_facts t
            LEFT JOIN enzymes e ON e.ec_number = t.ec_number
            WHERE e.ec_number IS NULL
            "#,
            [],
            |row| row.get(0),
        )?;

        Ok(Self {
            table_counts,
            top_categories,
            top_text_fields,
            orphan_text_ec_numbers: u64::try_from(orphans).unwrap_or(0),
        })
    }
}

fn ranked(conn: &Connection, sql: &str, top: usize) -> Result<Vec<RankedCount>> {
    let limit = i64::try_from(top).unwrap_or(i64::MAX);
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([limit], |row| {
            let count: i64 = row.get(1)?;
            Ok(RankedCount {
                name: row.get(0)?,
                count: u64::try_from(count).unwrap_or(0),
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
