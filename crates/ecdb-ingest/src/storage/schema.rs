//! SQLite schema for the enzyme store

use crate::error::Result;
use rusqlite::Connection;
use std::path::Path;
use tracing::{debug, info};

/// Tables of the store, in load order
pub const TABLES: [&str; 4] = ["enzymes", "proteins", "enzyme_facts", "text_facts"];

/// Create all tables
pub fn init_schema(conn: &Connection) -> Result<()> {
    // One row per EC number; counts are an ingest-time snapshot. Child
    // tables carry no foreign keys: the pipeline writes each enzyme first.
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS enzymes (
            ec_number TEXT PRIMARY KEY,
            enzyme_id TEXT,
            recommended_name TEXT,
            systematic_name TEXT,
            reaction_summary TEXT,
            protein_count INTEGER,
            synonym_count INTEGER,
            reaction_count INTEGER,
            km_count INTEGER,
            turnover_count INTEGER,
            inhibitor_count INTEGER
        )
        "#,
        [],
    )?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS proteins (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            ec_number TEXT NOT NULL,
            protein_id TEXT,
            organism TEXT,
            comment TEXT,
            reference_ids TEXT,
            raw_json TEXT
        )
        "#,
        [],
    )?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS enzyme_facts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            ec_number TEXT NOT NULL,
            category TEXT NOT NULL,
            value TEXT,
            value_numeric_low REAL,
            value_numeric_high REAL,
            unit TEXT,
            context TEXT,
            comment TEXT,
            proteins TEXT,
            reference_ids TEXT,
            raw_json TEXT
        )
        "#,
        [],
    )?;

    // text_facts may name EC numbers absent from enzymes
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS text_facts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            ec_number TEXT NOT NULL,
            field_code TEXT NOT NULL,
            field_name TEXT,
            value_raw TEXT NOT NULL,
            value_text TEXT,
            protein_tokens TEXT,
            reference_tokens TEXT,
            qualifiers TEXT
        )
        "#,
        [],
    )?;

    Ok(())
}

/// Create lookup indexes; run once after the bulk load
pub fn create_indexes(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE INDEX IF NOT EXISTS idx_proteins_ec ON proteins(ec_number);
        CREATE INDEX IF NOT EXISTS idx_facts_ec ON enzyme_facts(ec_number);
        CREATE INDEX IF NOT EXISTS idx_facts_category ON enzyme_facts(category);
        CREATE INDEX IF NOT EXISTS idx_facts_value ON enzyme_facts(value_numeric_low, value_numeric_high);
        CREATE INDEX IF NOT EXISTS idx_text_ec ON text_facts(ec_number);
        CREATE INDEX IF NOT EXISTS idx_text_code ON text_facts(field_code);
        "#,
    )?;
    info!("Created store indexes");
    Ok(())
}

/// Apply bulk-load pragmas
pub fn apply_pragmas(conn: &Connection) -> Result<()> {
    let journal_mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    conn.pragma_update(None, "synchronous", "OFF")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;
    debug!(journal_mode = %journal_mode, "Applied store pragmas");
    Ok(())
}

/// Remove a previous store and its WAL siblings, and create the parent
/// directory
pub fn reset_store(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    for suffix in ["", "-wal", "-shm", "-journal"] {
        let mut name = path.as_os_str().to_owned();
        name.push(suffix);
        let candidate = Path::new(&name);
        if candidate.exists() {
            std::fs::remove_file(candidate)?;
            debug!(path = %candidate.display(), "Removed previous store file");
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn names(conn: &Connection, kind: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = ?1 AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap();
        let names = stmt
            .query_map([kind], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        names
    }

    #[test]
    fn test_init_schema() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let tables = names(&conn, "table");
        for table in TABLES {
            assert!(tables.contains(&table.to_string()), "missing {}", table);
        }
    }

    #[test]
    fn test_schema_and_indexes_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
        create_indexes(&conn).unwrap();
        create_indexes(&conn).unwrap();

        assert_eq!(
            names(&conn, "index"),
            vec![
                "idx_facts_category",
                "idx_facts_ec",
                "idx_facts_value",
                "idx_proteins_ec",
                "idx_text_code",
                "idx_text_ec"
            ]
        );
    }

    #[test]
    fn test_reset_store_removes_siblings() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("store.db");
        reset_store(&db).unwrap();
        assert!(db.parent().unwrap().is_dir());

        for suffix in ["", "-wal", "-shm"] {
            std::fs::write(format!("{}{}", db.display(), suffix), b"stale").unwrap();
        }
        reset_store(&db).unwrap();

        for suffix in ["", "-wal", "-shm"] {
            assert!(!Path::new(&format!("{}{}", db.display(), suffix)).exists());
        }
    }

    #[test]
    fn test_pragmas_on_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let conn = Connection::open(dir.path().join("store.db")).unwrap();
        apply_pragmas(&conn).unwrap();

        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }
}
