use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::parser::{CableRecord, SENTINEL};

pub const DEFAULT_DB_PATH: &str = "data/cables.sqlite";

/// Text columns that can degrade to the sentinel, as (column, label).
const FIELD_COLUMNS: &[(&str, &str)] = &[
    ("cable_type", "typeofCable"),
    ("tube", "tube"),
    ("tube_color_coding", "tubeColorCoding"),
    ("fiber_type", "fiberType"),
    ("diameter", "diameter"),
    ("tensile", "tensile"),
    ("nesc_condition", "nescCondition"),
    ("crush", "crush"),
];

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS cables (
            id                INTEGER PRIMARY KEY,
            cable_id          INTEGER NOT NULL,
            datasheet         TEXT NOT NULL,
            fiber_count       TEXT NOT NULL,
            description       TEXT NOT NULL,
            cable_type        TEXT NOT NULL,
            span              TEXT NOT NULL,
            tube              TEXT NOT NULL,
            tube_color_coding TEXT NOT NULL,
            fiber_type        TEXT NOT NULL,
            diameter          TEXT NOT NULL,
            tensile           TEXT NOT NULL,
            nesc_condition    TEXT NOT NULL,
            crush             TEXT NOT NULL,
            blowing_length    TEXT NOT NULL,
            is_active         TEXT NOT NULL,
            extracted_at      TEXT NOT NULL,
            UNIQUE(datasheet, fiber_count)
        );
        CREATE INDEX IF NOT EXISTS idx_cables_fiber_type ON cables(fiber_type);
        CREATE INDEX IF NOT EXISTS idx_cables_cable_type ON cables(cable_type);
        ",
    )?;
    Ok(())
}

/// Upsert records keyed by (datasheet, fiber count). Returns rows written.
pub fn save_cables(conn: &Connection, records: &[CableRecord]) -> Result<usize> {
    let extracted_at = chrono::Utc::now().to_rfc3339();
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO cables
             (cable_id, datasheet, fiber_count, description, cable_type, span, tube,
              tube_color_coding, fiber_type, diameter, tensile, nesc_condition, crush,
              blowing_length, is_active, extracted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        )?;
        for r in records {
            count += stmt.execute(rusqlite::params![
                r.cable_id,
                r.datasheet,
                r.fiber_count,
                r.description,
                r.cable_type,
                r.span,
                r.tube,
                r.tube_color_coding,
                r.fiber_type,
                r.diameter,
                r.tensile,
                r.nesc_condition,
                r.crush,
                r.blowing_length,
                r.is_active,
                extracted_at,
            ])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

// ── Overview ──

pub struct OverviewRow {
    pub cable_id: u32,
    pub datasheet: String,
    pub fiber_count: String,
    pub cable_type: String,
    pub fiber_type: String,
    pub diameter: String,
    pub tensile: String,
    pub crush: String,
}

pub fn fetch_overview(
    conn: &Connection,
    fiber_type: Option<&str>,
    cable_type: Option<&str>,
    limit: usize,
) -> Result<Vec<OverviewRow>> {
    let mut conditions = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    if let Some(f) = fiber_type {
        conditions.push(format!("fiber_type = ?{}", params.len() + 1));
        params.push(Box::new(f.to_uppercase()));
    }
    if let Some(c) = cable_type {
        conditions.push(format!("cable_type = ?{}", params.len() + 1));
        params.push(Box::new(c.to_uppercase()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        "SELECT cable_id, datasheet, fiber_count, cable_type, fiber_type, diameter, tensile, crush
         FROM cables{}
         ORDER BY cable_id
         LIMIT {}",
        where_clause, limit
    );

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt
        .query_map(param_refs.as_slice(), |row| {
            Ok(OverviewRow {
                cable_id: row.get(0)?,
                datasheet: row.get(1)?,
                fiber_count: row.get(2)?,
                cable_type: row.get(3)?,
                fiber_type: row.get(4)?,
                diameter: row.get(5)?,
                tensile: row.get(6)?,
                crush: row.get(7)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub datasheets: usize,
    pub records: usize,
    pub single_mode: usize,
    pub multi_mode: usize,
    /// (field label, records where it is the sentinel)
    pub missing: Vec<(&'static str, usize)>,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let datasheets: usize =
        conn.query_row("SELECT COUNT(DISTINCT datasheet) FROM cables", [], |r| r.get(0))?;
    let records: usize = conn.query_row("SELECT COUNT(*) FROM cables", [], |r| r.get(0))?;
    let single_mode: usize = conn.query_row(
        "SELECT COUNT(*) FROM cables WHERE fiber_type = 'SM'",
        [],
        |r| r.get(0),
    )?;
    let multi_mode: usize = conn.query_row(
        "SELECT COUNT(*) FROM cables WHERE fiber_type = 'MM'",
        [],
        |r| r.get(0),
    )?;

    let mut missing = Vec::with_capacity(FIELD_COLUMNS.len());
    for (column, label) in FIELD_COLUMNS {
        let n: usize = conn.query_row(
            &format!("SELECT COUNT(*) FROM cables WHERE {} = ?1", column),
            [SENTINEL],
            |r| r.get(0),
        )?;
        missing.push((*label, n));
    }

    Ok(Stats {
        datasheets,
        records,
        single_mode,
        multi_mode,
        missing,
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_all, Document};

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let docs = vec![
            Document::new(
                "unitube.pdf",
                std::fs::read_to_string("tests/fixtures/unitube_table.txt").unwrap(),
            ),
            Document::new(
                "multitube.pdf",
                std::fs::read_to_string("tests/fixtures/multitube_freetext.txt").unwrap(),
            ),
        ];
        let out = parse_all(&docs);
        assert_eq!(save_cables(&conn, &out.records).unwrap(), 5);
        conn
    }

    #[test]
    fn overview_filters_and_orders() {
        let conn = seeded();
        let all = fetch_overview(&conn, None, None, 50).unwrap();
        let ids: Vec<u32> = all.iter().map(|r| r.cable_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);

        let mm = fetch_overview(&conn, Some("mm"), None, 50).unwrap();
        assert_eq!(mm.len(), 2);
        assert!(mm.iter().all(|r| r.datasheet == "multitube.pdf"));

        let ut_sm = fetch_overview(&conn, Some("SM"), Some("UT"), 2).unwrap();
        assert_eq!(ut_sm.len(), 2);
        assert_eq!(ut_sm[0].fiber_count, "4");
    }

    #[test]
    fn saving_twice_replaces_rows() {
        let conn = seeded();
        let rows = fetch_overview(&conn, None, None, 50).unwrap();
        assert_eq!(rows.len(), 5);
        let records: Vec<CableRecord> = crate::parser::parse_datasheet(
            "multitube.pdf",
            &std::fs::read_to_string("tests/fixtures/multitube_freetext.txt").unwrap(),
        );
        save_cables(&conn, &records).unwrap();
        assert_eq!(get_stats(&conn).unwrap().records, 5);
    }

    #[test]
    fn stats_count_sentinels() {
        let conn = seeded();
        let s = get_stats(&conn).unwrap();
        assert_eq!(s.datasheets, 2);
        assert_eq!(s.records, 5);
        assert_eq!(s.single_mode, 3);
        assert_eq!(s.multi_mode, 2);
        let nesc = s.missing.iter().find(|(l, _)| *l == "nescCondition").unwrap();
        assert_eq!(nesc.1, 2);
        let tensile = s.missing.iter().find(|(l, _)| *l == "tensile").unwrap();
        assert_eq!(tensile.1, 0);
    }

    #[test]
    fn connect_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cables.sqlite");
        let conn = connect(&path).unwrap();
        init_schema(&conn).unwrap();
        assert!(path.exists());
    }
}
