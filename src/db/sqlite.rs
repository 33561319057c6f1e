//! SQLite persistence for staged artifact batches.

use anyhow::Result;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection};
use std::path::Path;

use super::schema::SCHEMA;
use crate::harvest::{ColorRow, MediaRow, MetadataRow};

/// Outcome of an idempotent metadata insert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertReport {
    pub inserted: usize,
    pub ignored: usize,
}

/// Row counts per table, for the Load tab.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableStats {
    pub metadata: i64,
    pub media: i64,
    pub colors: i64,
}

/// A generic query result: column names plus stringified row values.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub struct Database {
    pub(crate) conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    pub fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Insert metadata rows, ignoring ids that already exist.
    pub fn insert_metadata(&mut self, rows: &[MetadataRow]) -> Result<InsertReport> {
        let mut report = InsertReport::default();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO artifact_metadata \
                 (id, title, culture, period, century, medium, dimensions, \
                  description, department, classification, accessionyear, accessionmethod) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            for row in rows {
                let changed = stmt.execute(params![
                    row.id,
                    row.title,
                    row.culture,
                    row.period,
                    row.century,
                    row.medium,
                    row.dimensions,
                    row.description,
                    row.department,
                    row.classification,
                    row.accessionyear,
                    row.accessionmethod,
                ])?;
                if changed == 0 {
                    report.ignored += 1;
                } else {
                    report.inserted += 1;
                }
            }
        }
        tx.commit()?;
        Ok(report)
    }

    /// Insert media rows. Plain append: re-inserting duplicates rows.
    pub fn insert_media(&mut self, rows: &[MediaRow]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO artifact_media \
                 (objectid, imagecount, mediacount, colorcount, ranks, datebegin, dateend) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                stmt.execute(params![
                    row.objectid,
                    row.imagecount,
                    row.mediacount,
                    row.colorcount,
                    row.rank,
                    row.datebegin,
                    row.dateend,
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    /// Insert color rows. Plain append, like media.
    pub fn insert_colors(&mut self, rows: &[ColorRow]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO artifact_colors (objectid, color, spectrum, hue, percent, css3) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                stmt.execute(params![
                    row.objectid,
                    row.color,
                    row.spectrum,
                    row.hue,
                    row.percent,
                    row.css3,
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    /// Run one catalog query and collect a displayable result set.
    pub fn run_query(&self, sql: &str) -> Result<ResultSet> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let column_count = columns.len();

        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Vec::with_capacity(column_count);
            for i in 0..column_count {
                record.push(format_value(row.get_ref(i)?));
            }
            out.push(record);
        }

        Ok(ResultSet { columns, rows: out })
    }

    pub fn table_stats(&self) -> Result<TableStats> {
        Ok(TableStats {
            metadata: self.count_rows("artifact_metadata")?,
            media: self.count_rows("artifact_media")?,
            colors: self.count_rows("artifact_colors")?,
        })
    }

    fn count_rows(&self, table: &str) -> Result<i64> {
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn format_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => format_real(f),
        ValueRef::Text(t) => String::from_utf8_lossy(t).to_string(),
        ValueRef::Blob(_) => "<blob>".to_string(),
    }
}

fn format_real(f: f64) -> String {
    if f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        let s = format!("{:.4}", f);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata_row(id: i64) -> MetadataRow {
        MetadataRow {
            id,
            title: Some(format!("Object {}", id)),
            culture: Some("Greek".to_string()),
            period: None,
            century: Some("5th century BCE".to_string()),
            medium: None,
            dimensions: None,
            description: None,
            department: Some("Ancient".to_string()),
            classification: Some("Coins".to_string()),
            accessionyear: Some(1943),
            accessionmethod: None,
        }
    }

    fn media_row(objectid: i64) -> MediaRow {
        MediaRow {
            objectid,
            imagecount: Some(2),
            mediacount: Some(2),
            colorcount: 1,
            rank: Some(100),
            datebegin: Some(-450),
            dateend: Some(-400),
        }
    }

    fn color_row(objectid: i64) -> ColorRow {
        ColorRow {
            objectid,
            color: Some("#c8c8c8".to_string()),
            spectrum: Some("#8c5fa8".to_string()),
            hue: Some("Grey".to_string()),
            percent: Some(0.62),
            css3: Some("#c0c0c0".to_string()),
        }
    }

    fn open_test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        db
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let db = open_test_db();
        db.initialize().unwrap();
    }

    #[test]
    fn test_metadata_insert_ignores_existing_ids() {
        let mut db = open_test_db();

        let report = db.insert_metadata(&[metadata_row(1), metadata_row(2)]).unwrap();
        assert_eq!(report, InsertReport { inserted: 2, ignored: 0 });

        // Re-inserting the same ids is a no-op.
        let report = db.insert_metadata(&[metadata_row(1), metadata_row(3)]).unwrap();
        assert_eq!(report, InsertReport { inserted: 1, ignored: 1 });

        assert_eq!(db.table_stats().unwrap().metadata, 3);
    }

    #[test]
    fn test_media_and_colors_append_duplicates() {
        let mut db = open_test_db();
        db.insert_metadata(&[metadata_row(1)]).unwrap();

        db.insert_media(&[media_row(1)]).unwrap();
        db.insert_media(&[media_row(1)]).unwrap();
        db.insert_colors(&[color_row(1)]).unwrap();
        db.insert_colors(&[color_row(1)]).unwrap();

        let stats = db.table_stats().unwrap();
        assert_eq!(stats.media, 2);
        assert_eq!(stats.colors, 2);
    }

    #[test]
    fn test_run_query_stringifies_values() {
        let mut db = open_test_db();
        db.insert_metadata(&[metadata_row(7)]).unwrap();
        db.insert_colors(&[color_row(7)]).unwrap();

        let result = db
            .run_query("SELECT id, title, period FROM artifact_metadata")
            .unwrap();
        assert_eq!(result.columns, vec!["id", "title", "period"]);
        assert_eq!(result.rows, vec![vec![
            "7".to_string(),
            "Object 7".to_string(),
            String::new(),
        ]]);

        let result = db
            .run_query("SELECT percent FROM artifact_colors")
            .unwrap();
        assert_eq!(result.rows[0][0], "0.62");
    }

    #[test]
    fn test_run_query_on_file_backed_db() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = Database::open(&dir.path().join("curio.db")).unwrap();
        db.initialize().unwrap();
        db.insert_metadata(&[metadata_row(1)]).unwrap();

        let result = db
            .run_query("SELECT COUNT(*) AS n FROM artifact_metadata")
            .unwrap();
        assert_eq!(result.columns, vec!["n"]);
        assert_eq!(result.rows[0][0], "1");
    }

    #[test]
    fn test_format_real_trims_noise() {
        assert_eq!(format_real(3.0), "3.0");
        assert_eq!(format_real(0.62), "0.62");
        assert_eq!(format_real(1.0 / 3.0), "0.3333");
    }
}
