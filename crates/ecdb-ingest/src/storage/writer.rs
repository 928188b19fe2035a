//! Batched writes into the enzyme store
//!
//! Rows are buffered per table and written in one transaction per batch. A
//! buffer is flushed as soon as it reaches the batch size. Before proteins or
//! facts are flushed the enzyme buffer is flushed first, so a fact never
//! lands in the store ahead of its enzyme.

use super::schema;
use crate::error::Result;
use ecdb_common::{Enzyme, EnzymeFact, Protein, TextFact};
use rusqlite::{params, Connection, Statement};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Rows per write transaction
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// A row type with its insert statement
trait StoreRow {
    const TABLE: &'static str;
    const INSERT_SQL: &'static str;

    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize>;
}

impl StoreRow for Enzyme {
    const TABLE: &'static str = "enzymes";
    const INSERT_SQL: &'static str = r#"
        INSERT INTO enzymes (
            ec_number, enzyme_id, recommended_name, systematic_name, reaction_summary,
            protein_count, synonym_count, reaction_count, km_count, turnover_count, inhibitor_count
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
    "#;

    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.ec_number,
            self.enzyme_id,
            self.recommended_name,
            self.systematic_name,
            self.reaction_summary,
            self.protein_count,
            self.synonym_count,
            self.reaction_count,
            self.km_count,
            self.turnover_count,
            self.inhibitor_count,
        ])
    }
}

impl StoreRow for Protein {
    const TABLE: &'static str = "proteins";
    const INSERT_SQL: &'static str = r#"
        INSERT INTO proteins (ec_number, protein_id, organism, comment, reference_ids, raw_json)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    "#;

    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.ec_number,
            self.protein_id,
            self.organism,
            self.comment,
            self.reference_ids,
            self.raw_json,
        ])
    }
}

impl StoreRow for EnzymeFact {
    const TABLE: &'static str = "enzyme_facts";
    const INSERT_SQL: &'static str = r#"
        INSERT INTO enzyme_facts (
            ec_number, category, value, value_numeric_low, value_numeric_high,
            unit, context, comment, proteins, reference_ids, raw_json
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
    "#;

    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.ec_number,
            self.category,
            self.value,
            self.value_numeric_low,
            self.value_numeric_high,
            self.unit,
            self.context,
            self.comment,
            self.proteins,
            self.reference_ids,
            self.raw_json,
        ])
    }
}

impl StoreRow for TextFact {
    const TABLE: &'static str = "text_facts";
    const INSERT_SQL: &'static str = r#"
        INSERT INTO text_facts (
            ec_number, field_code, field_name, value_raw, value_text,
            protein_tokens, reference_tokens, qualifiers
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
    "#;

    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.ec_number,
            self.field_code,
            self.field_name,
            self.value_raw,
            self.value_text,
            self.protein_tokens,
            self.reference_tokens,
            self.qualifiers,
        ])
    }
}

/// Rows and write transactions for one table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableStats {
    pub rows: u64,
    pub batches: u64,
}

/// Write statistics for all tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriteStats {
    pub enzymes: TableStats,
    pub proteins: TableStats,
    pub enzyme_facts: TableStats,
    pub text_facts: TableStats,
}

struct Batch<T> {
    rows: Vec<T>,
    stats: TableStats,
}

impl<T: StoreRow> Batch<T> {
    fn new(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
            stats: TableStats::default(),
        }
    }

    fn push(&mut self, row: T, batch_size: usize) -> bool {
        self.rows.push(row);
        self.rows.len() >= batch_size
    }

    fn flush(&mut self, conn: &mut Connection) -> Result<()> {
        if self.rows.is_empty() {
            return Ok(());
        }

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(T::INSERT_SQL)?;
            for row in &self.rows {
                row.insert(&mut stmt)?;
            }
        }
        tx.commit()?;

        let written = self.rows.len() as u64;
        self.stats.rows += written;
        self.stats.batches += 1;
        self.rows.clear();
        debug!(table = T::TABLE, rows = written, "Flushed batch");
        Ok(())
    }
}

/// Buffered writer over a store connection
pub struct BatchWriter {
    conn: Connection,
    batch_size: usize,
    enzymes: Batch<Enzyme>,
    proteins: Batch<Protein>,
    facts: Batch<EnzymeFact>,
    text_facts: Batch<TextFact>,
}

/// A fully loaded store
pub struct LoadedStore {
    pub conn: Connection,
    pub stats: WriteStats,
}

impl BatchWriter {
    /// Rebuild the store at `path`: any previous database is deleted first
    pub fn create(path: &Path, batch_size: usize) -> Result<Self> {
        schema::reset_store(path)?;
        let conn = Connection::open(path)?;
        schema::apply_pragmas(&conn)?;
        info!(path = %path.display(), batch_size, "Created store");
        Self::with_connection(conn, batch_size)
    }

    /// Writer over a fresh in-memory store
    pub fn in_memory(batch_size: usize) -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, batch_size)
    }

    fn with_connection(conn: Connection, batch_size: usize) -> Result<Self> {
        schema::init_schema(&conn)?;
        let batch_size = batch_size.max(1);
        Ok(Self {
            conn,
            batch_size,
            enzymes: Batch::new(batch_size),
            proteins: Batch::new(batch_size),
            facts: Batch::new(batch_size),
            text_facts: Batch::new(batch_size),
        })
    }

    pub fn push_enzyme(&mut self, enzyme: Enzyme) -> Result<()> {
        if self.enzymes.push(enzyme, self.batch_size) {
            self.enzymes.flush(&mut self.conn)?;
        }
        Ok(())
    }

    pub fn push_protein(&mut self, protein: Protein) -> Result<()> {
        if self.proteins.push(protein, self.batch_size) {
            self.enzymes.flush(&mut self.conn)?;
            self.proteins.flush(&mut self.conn)?;
        }
        Ok(())
    }

    pub fn push_fact(&mut self, fact: EnzymeFact) -> Result<()> {
        if self.facts.push(fact, self.batch_size) {
            self.enzymes.flush(&mut self.conn)?;
            self.facts.flush(&mut self.conn)?;
        }
        Ok(())
    }

    pub fn push_text_fact(&mut self, fact: TextFact) -> Result<()> {
        if self.text_facts.push(fact, self.batch_size) {
            self.text_facts.flush(&mut self.conn)?;
        }
        Ok(())
    }

    /// Write every buffered row, enzymes first
    pub fn flush_all(&mut self) -> Result<()> {
        self.enzymes.flush(&mut self.conn)?;
        self.proteins.flush(&mut self.conn)?;
        self.facts.flush(&mut self.conn)?;
        self.text_facts.flush(&mut self.conn)?;
        Ok(())
    }

    pub fn stats(&self) -> WriteStats {
        WriteStats {
            enzymes: self.enzymes.stats,
            proteins: self.proteins.stats,
            enzyme_facts: self.facts.stats,
            text_facts: self.text_facts.stats,
        }
    }

    /// Flush the remainder and build indexes
    pub fn finish(mut self) -> Result<LoadedStore> {
        self.flush_all()?;
        schema::create_indexes(&self.conn)?;
        let stats = self.stats();
        Ok(LoadedStore {
            conn: self.conn,
            stats,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn enzyme(ec: &str) -> Enzyme {
        Enzyme {
            ec_number: ec.to_string(),
            enzyme_id: Some(ec.to_string()),
            recommended_name: None,
            systematic_name: None,
            reaction_summary: None,
            protein_count: 0,
            synonym_count: 0,
            reaction_count: 0,
            km_count: 1,
            turnover_count: 0,
            inhibitor_count: 0,
        }
    }

    fn fact(ec: &str, n: usize) -> EnzymeFact {
        EnzymeFact {
            ec_number: ec.to_string(),
            category: "km_value".to_string(),
            value: Some(format!("{} mM", n)),
            value_numeric_low: Some(n as f64),
            value_numeric_high: Some(n as f64),
            unit: Some("mM".to_string()),
            context: None,
            comment: None,
            proteins: None,
            reference_ids: None,
            raw_json: "{}".to_string(),
        }
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_exact_batch_flushes_once() {
        let mut writer = BatchWriter::in_memory(3).unwrap();
        for n in 0..3 {
            writer.push_fact(fact("1.1.1.1", n)).unwrap();
        }
        assert_eq!(writer.stats().enzyme_facts, TableStats { rows: 3, batches: 1 });

        let store = writer.finish().unwrap();
        assert_eq!(store.stats.enzyme_facts, TableStats { rows: 3, batches: 1 });
        assert_eq!(count(&store.conn, "enzyme_facts"), 3);
    }

    #[test]
    fn test_one_past_batch_flushes_remainder_at_finish() {
        let mut writer = BatchWriter::in_memory(3).unwrap();
        for n in 0..4 {
            writer.push_fact(fact("1.1.1.1", n)).unwrap();
        }
        assert_eq!(writer.stats().enzyme_facts, TableStats { rows: 3, batches: 1 });

        let store = writer.finish().unwrap();
        assert_eq!(store.stats.enzyme_facts, TableStats { rows: 4, batches: 2 });
        assert_eq!(count(&store.conn, "enzyme_facts"), 4);
    }

    #[test]
    fn test_enzyme_written_before_its_facts() {
        let mut writer = BatchWriter::in_memory(2).unwrap();
        writer.push_enzyme(enzyme("1.1.1.1")).unwrap();
        writer.push_fact(fact("1.1.1.1", 1)).unwrap();
        assert_eq!(writer.stats().enzymes.rows, 0);

        writer.push_fact(fact("1.1.1.1", 2)).unwrap();
        let stats = writer.stats();
        assert_eq!(stats.enzymes.rows, 1);
        assert_eq!(stats.enzyme_facts.rows, 2);
    }

    #[test]
    fn test_round_trip_columns() {
        let mut writer = BatchWriter::in_memory(10).unwrap();
        writer.push_enzyme(enzyme("1.1.1.1")).unwrap();
        writer.push_fact(fact("1.1.1.1", 7)).unwrap();
        writer
            .push_text_fact(TextFact {
                ec_number: "1.1.1.1".to_string(),
                field_code: "KM".to_string(),
                field_name: Some("Km value".to_string()),
                value_raw: "#1# 7 <2>".to_string(),
                value_text: "1 7".to_string(),
                protein_tokens: Some("1".to_string()),
                reference_tokens: Some("2".to_string()),
                qualifiers: None,
            })
            .unwrap();
        let store = writer.finish().unwrap();

        let (low, unit): (f64, String) = store
            .conn
            .query_row(
                "SELECT value_numeric_low, unit FROM enzyme_facts",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(low, 7.0);
        assert_eq!(unit, "mM");

        let km_count: i64 = store
            .conn
            .query_row("SELECT km_count FROM enzymes WHERE ec_number = '1.1.1.1'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(km_count, 1);

        let qualifiers: Option<String> = store
            .conn
            .query_row("SELECT qualifiers FROM text_facts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(qualifiers, None);
    }

    #[test]
    fn test_duplicate_ec_number_is_fatal() {
        let mut writer = BatchWriter::in_memory(1).unwrap();
        writer.push_enzyme(enzyme("1.1.1.1")).unwrap();
        assert!(writer.push_enzyme(enzyme("1.1.1.1")).is_err());
    }

    #[test]
    fn test_create_replaces_previous_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");

        let mut writer = BatchWriter::create(&path, 10).unwrap();
        writer.push_enzyme(enzyme("1.1.1.1")).unwrap();
        drop(writer.finish().unwrap());

        let store = BatchWriter::create(&path, 10).unwrap().finish().unwrap();
        assert_eq!(count(&store.conn, "enzymes"), 0);
    }
}
