//! # SQLite Record Store
//!
//! Implements `RecordStore` on a single `hafalan` table using `rusqlite`.
//! The connection sits behind a mutex and every week assignment runs in a
//! `BEGIN IMMEDIATE` transaction, so read-max-then-insert is one serialized write
//! even when several processes share the database file.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params};

use crate::domain::errors::StoreError;
use crate::domain::traits::RecordStore;
use crate::domain::types::{MemorizationRecord, NewRecord, WeekAssignment};

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS hafalan (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  student_name TEXT NOT NULL,
  period_label TEXT NOT NULL,
  week_number INTEGER NOT NULL CHECK (week_number >= 1),
  pages_this_week INTEGER NOT NULL CHECK (pages_this_week >= 0),
  cumulative_total REAL NOT NULL,
  recorded_at TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_hafalan_student_period_week
  ON hafalan(student_name, period_label, week_number);
CREATE INDEX IF NOT EXISTS idx_hafalan_period
  ON hafalan(period_label, student_name);
";

const SELECT_COLUMNS: &str = "SELECT id, student_name, period_label, week_number, pages_this_week, cumulative_total, recorded_at FROM hafalan";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn query(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<MemorizationRecord>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, map_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

fn map_record(row: &Row<'_>) -> rusqlite::Result<MemorizationRecord> {
    Ok(MemorizationRecord {
        id: row.get(0)?,
        student_name: row.get(1)?,
        period_label: row.get(2)?,
        week_number: row.get(3)?,
        pages_this_week: row.get(4)?,
        cumulative_total: row.get(5)?,
        recorded_at: row.get(6)?,
    })
}

impl RecordStore for SqliteStore {
    fn append(
        &self,
        record: &NewRecord,
        week: WeekAssignment,
    ) -> Result<MemorizationRecord, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current: Option<u32> = tx.query_row(
            "SELECT MAX(week_number) FROM hafalan WHERE student_name = ?1 AND period_label = ?2",
            params![record.student_name, record.period_label],
            |row| row.get(0),
        )?;
        let next = current.unwrap_or(0) + 1;

        let week_number = match week {
            WeekAssignment::Next => next,
            WeekAssignment::Exact(requested) if requested == next => requested,
            WeekAssignment::Exact(requested) => {
                return Err(StoreError::WeekOutOfSequence {
                    expected: next,
                    requested,
                });
            }
        };

        let recorded_at = chrono::Local::now().to_rfc3339();
        tx.execute(
            "INSERT INTO hafalan (student_name, period_label, week_number, pages_this_week, cumulative_total, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.student_name,
                record.period_label,
                week_number,
                record.pages_this_week,
                record.cumulative_total,
                recorded_at,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(MemorizationRecord {
            id,
            student_name: record.student_name.clone(),
            period_label: record.period_label.clone(),
            week_number,
            pages_this_week: record.pages_this_week,
            cumulative_total: record.cumulative_total,
            recorded_at,
        })
    }

    fn correct(
        &self,
        student_name: &str,
        period_label: &str,
        week_number: u32,
        pages_this_week: u32,
        cumulative_total: f64,
    ) -> Result<Option<MemorizationRecord>, StoreError> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE hafalan SET pages_this_week = ?4, cumulative_total = ?5
             WHERE student_name = ?1 AND period_label = ?2 AND week_number = ?3",
            params![student_name, period_label, week_number, pages_this_week, cumulative_total],
        )?;
        if changed == 0 {
            return Ok(None);
        }

        let record = conn
            .query_row(
                &format!(
                    "{SELECT_COLUMNS} WHERE student_name = ?1 AND period_label = ?2 AND week_number = ?3"
                ),
                params![student_name, period_label, week_number],
                map_record,
            )
            .optional()?;
        Ok(record)
    }

    fn by_student(&self, student_name: &str) -> Result<Vec<MemorizationRecord>, StoreError> {
        self.query(
            &format!("{SELECT_COLUMNS} WHERE student_name = ?1 ORDER BY id"),
            params![student_name],
        )
    }

    fn by_period(
        &self,
        period_label: &str,
        student_name: Option<&str>,
    ) -> Result<Vec<MemorizationRecord>, StoreError> {
        match student_name {
            Some(name) => self.query(
                &format!(
                    "{SELECT_COLUMNS} WHERE period_label = ?1 AND student_name = ?2 ORDER BY id"
                ),
                params![period_label, name],
            ),
            None => self.query(
                &format!("{SELECT_COLUMNS} WHERE period_label = ?1 ORDER BY id"),
                params![period_label],
            ),
        }
    }

    fn student_names(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT DISTINCT student_name FROM hafalan ORDER BY student_name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn entry(name: &str, period: &str, pages: u32, total: f64) -> NewRecord {
        NewRecord {
            student_name: name.to_string(),
            period_label: period.to_string(),
            pages_this_week: pages,
            cumulative_total: total,
        }
    }

    #[test]
    fn test_next_week_is_contiguous() {
        let store = SqliteStore::open_in_memory().unwrap();
        for expected in 1..=5 {
            let rec = store
                .append(&entry("Ahmad", "March 2025", 3, 1.5), WeekAssignment::Next)
                .unwrap();
            assert_eq!(rec.week_number, expected);
        }
    }

    #[test]
    fn test_weeks_are_scoped_to_student_and_period() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.append(&entry("Ahmad", "March 2025", 3, 1.0), WeekAssignment::Next).unwrap();
        store.append(&entry("Ahmad", "March 2025", 3, 1.0), WeekAssignment::Next).unwrap();

        let other = store
            .append(&entry("Fatimah", "March 2025", 2, 0.5), WeekAssignment::Next)
            .unwrap();
        assert_eq!(other.week_number, 1);

        let april = store
            .append(&entry("Ahmad", "April 2025", 4, 1.25), WeekAssignment::Next)
            .unwrap();
        assert_eq!(april.week_number, 1);
    }

    #[test]
    fn test_exact_week_must_be_next() {
        let store = SqliteStore::open_in_memory().unwrap();
        let first = store
            .append(&entry("Ahmad", "March 2025", 3, 1.0), WeekAssignment::Exact(1))
            .unwrap();
        assert_eq!(first.week_number, 1);

        let err = store
            .append(&entry("Ahmad", "March 2025", 3, 1.0), WeekAssignment::Exact(3))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::WeekOutOfSequence { expected: 2, requested: 3 }
        ));
        assert_eq!(store.by_student("Ahmad").unwrap().len(), 1);
    }

    #[test]
    fn test_correct_existing_and_missing_row() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.append(&entry("Ahmad", "March 2025", 3, 1.0), WeekAssignment::Next).unwrap();

        let fixed = store.correct("Ahmad", "March 2025", 1, 6, 1.5).unwrap().unwrap();
        assert_eq!(fixed.pages_this_week, 6);
        assert_eq!(fixed.cumulative_total, 1.5);
        assert_eq!(fixed.week_number, 1);

        assert!(store.correct("Ahmad", "March 2025", 2, 6, 1.5).unwrap().is_none());
        assert_eq!(store.by_student("Ahmad").unwrap().len(), 1);
    }

    #[test]
    fn test_student_names_distinct_and_sorted() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.student_names().unwrap().is_empty());
        for name in ["Zaid", "Ahmad", "Zaid", "Fatimah", "ahmad"] {
            store.append(&entry(name, "March 2025", 1, 1.0), WeekAssignment::Next).unwrap();
        }
        assert_eq!(
            store.student_names().unwrap(),
            vec!["Ahmad", "Fatimah", "Zaid", "ahmad"]
        );
    }

    #[test]
    fn test_by_period_filters() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.append(&entry("Ahmad", "March 2025", 3, 1.0), WeekAssignment::Next).unwrap();
        store.append(&entry("Fatimah", "March 2025", 2, 2.0), WeekAssignment::Next).unwrap();
        store.append(&entry("Ahmad", "April 2025", 5, 1.5), WeekAssignment::Next).unwrap();

        assert_eq!(store.by_period("March 2025", None).unwrap().len(), 2);
        let ahmad = store.by_period("March 2025", Some("Ahmad")).unwrap();
        assert_eq!(ahmad.len(), 1);
        assert_eq!(ahmad[0].pages_this_week, 3);
        assert!(store.by_period("May 2025", None).unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_writers_keep_weeks_contiguous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hafalan.db");
        // Two handles on one file behave like two processes.
        let stores = [
            Arc::new(SqliteStore::open(&path).unwrap()),
            Arc::new(SqliteStore::open(&path).unwrap()),
        ];

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = stores[i % 2].clone();
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        store
                            .append(&entry("Ahmad", "March 2025", 1, 1.0), WeekAssignment::Next)
                            .unwrap();
                        store
                            .append(&entry("Fatimah", "March 2025", 1, 1.0), WeekAssignment::Next)
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        for name in ["Ahmad", "Fatimah"] {
            let mut weeks: Vec<u32> = stores[0]
                .by_student(name)
                .unwrap()
                .iter()
                .map(|r| r.week_number)
                .collect();
            weeks.sort_unstable();
            assert_eq!(weeks, (1..=40).collect::<Vec<u32>>());
        }
    }

    #[test]
    fn test_reopen_keeps_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hafalan.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.append(&entry("Ahmad", "March 2025", 3, 2.0), WeekAssignment::Next).unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        let next = store
            .append(&entry("Ahmad", "March 2025", 4, 2.25), WeekAssignment::Next)
            .unwrap();
        assert_eq!(next.week_number, 2);
    }
}
