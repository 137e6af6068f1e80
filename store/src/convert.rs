//! Conversions between SQLite values and core types.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rusqlite::Row;
use rusqlite::types::ValueRef;
use sql_practice_core::{CellValue, PracticeRecord, TIMESTAMP_FORMAT};
use tracing::warn;

use crate::error::{Result, StoreError};

/// Column list matching [`RecordRow::from_row`].
pub(crate) const RECORD_COLUMNS: &str =
    "id, topic, question_title, query_text, user_note, rows_returned, exec_time_ms, created_at";

/// Converts a borrowed SQLite value into an owned cell.
pub(crate) fn cell_value(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Null,
        ValueRef::Integer(v) => CellValue::Integer(v),
        ValueRef::Real(v) => CellValue::Real(v),
        ValueRef::Text(bytes) => CellValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => CellValue::Blob(bytes.to_vec()),
    }
}

/// Converts a count for storage in an `INTEGER` column.
pub(crate) fn count_to_sql(value: u64, column: &str) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| StoreError::ConversionError(format!("{column} out of range: {value}")))
}

/// Practice log row as stored; legacy rows may have `NULL` in any column.
pub(crate) struct RecordRow {
    id: i64,
    topic: Option<String>,
    question_title: Option<String>,
    query_text: Option<String>,
    user_note: Option<String>,
    rows_returned: Option<i64>,
    exec_time_ms: Option<i64>,
    created_at: Option<String>,
}

impl RecordRow {
    /// Reads a row selected with [`RECORD_COLUMNS`].
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            topic: row.get(1)?,
            question_title: row.get(2)?,
            query_text: row.get(3)?,
            user_note: row.get(4)?,
            rows_returned: row.get(5)?,
            exec_time_ms: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    /// Builds a record, tolerating legacy values: `NULL` falls back to a
    /// default, negative counts become 0 and an unreadable `created_at`
    /// becomes `None`. Each substitution is logged as a warning.
    pub(crate) fn into_record(self) -> PracticeRecord {
        let id = self.id;
        let count = |value: Option<i64>, column: &str| -> u64 {
            let value = value.unwrap_or(0);
            u64::try_from(value).unwrap_or_else(|_| {
                warn!(id, column, value, "negative count in practice log, using 0");
                0
            })
        };

        let created_at = match self.created_at.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let parsed = parse_timestamp(raw);
                if parsed.is_none() {
                    warn!(id, created_at = raw, "unreadable created_at in practice log");
                }
                parsed
            }
        };

        PracticeRecord {
            id,
            topic: self.topic.unwrap_or_default(),
            question_title: self.question_title.unwrap_or_default(),
            query_text: self.query_text.unwrap_or_default(),
            user_note: self.user_note,
            rows_returned: count(self.rows_returned, "rows_returned"),
            exec_time_ms: count(self.exec_time_ms, "exec_time_ms"),
            created_at,
        }
    }
}

/// Parses the timestamp forms found in practice logs: the stored
/// `YYYY-MM-DD HH:MM:SS`, ISO 8601 with `T` and fractional seconds,
/// RFC 3339 with an offset (kept as written) and a bare date.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 3] = [TIMESTAMP_FORMAT, "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_local())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn load(conn: &Connection) -> PracticeRecord {
        conn.query_row(
            &format!("SELECT {RECORD_COLUMNS} FROM practice_log"),
            [],
            RecordRow::from_row,
        )
        .unwrap()
        .into_record()
    }

    fn log_table() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE practice_log (id INTEGER PRIMARY KEY, topic TEXT, question_title TEXT,
             query_text TEXT, user_note TEXT, rows_returned INTEGER, exec_time_ms INTEGER,
             created_at TEXT)",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_cell_values() {
        let conn = Connection::open_in_memory().unwrap();
        let cells: Vec<CellValue> = conn
            .query_row("SELECT NULL, 7, 2.5, 'txt', x'0102'", [], |row| {
                (0..5usize).map(|i| row.get_ref(i).map(cell_value)).collect()
            })
            .unwrap();
        assert_eq!(
            cells,
            vec![
                CellValue::Null,
                CellValue::Integer(7),
                CellValue::Real(2.5),
                CellValue::Text("txt".into()),
                CellValue::Blob(vec![1, 2]),
            ]
        );
    }

    #[test]
    fn test_legacy_nulls_default() {
        let conn = log_table();
        conn.execute("INSERT INTO practice_log (id) VALUES (4)", []).unwrap();
        let record = load(&conn);
        assert_eq!(record.id, 4);
        assert_eq!(record.topic, "");
        assert_eq!(record.rows_returned, 0);
        assert!(record.created_at.is_none());
        assert!(record.user_note.is_none());
    }

    #[test]
    fn test_timestamp_parsed() {
        let conn = log_table();
        conn.execute(
            "INSERT INTO practice_log (id, created_at) VALUES (1, '2024-05-01 08:00:00')",
            [],
        )
        .unwrap();
        let record = load(&conn);
        assert_eq!(record.created_at_display(), "2024-05-01 08:00:00");
    }

    #[test]
    fn test_negative_count_clamped() {
        let conn = log_table();
        conn.execute(
            "INSERT INTO practice_log (id, rows_returned, exec_time_ms) VALUES (1, -3, 4)",
            [],
        )
        .unwrap();
        let record = load(&conn);
        assert_eq!(record.rows_returned, 0);
        assert_eq!(record.exec_time_ms, 4);
    }

    #[test]
    fn test_timestamp_variants() {
        for raw in [
            "2024-01-01T10:00:00",
            "2024-01-01 10:00:00.250",
            "2024-01-01T10:00:00.123456",
            "2024-01-01T10:00:00+02:00",
            " 2024-01-01 10:00:00 ",
        ] {
            let parsed = parse_timestamp(raw.trim());
            assert_eq!(
                parsed.map(|t| t.format(TIMESTAMP_FORMAT).to_string()).as_deref(),
                Some("2024-01-01 10:00:00"),
                "{raw}"
            );
        }
        assert_eq!(
            parse_timestamp("2024-01-01").map(|t| t.format(TIMESTAMP_FORMAT).to_string()),
            Some("2024-01-01 00:00:00".to_string())
        );
    }

    #[test]
    fn test_unreadable_timestamp_is_none() {
        let conn = log_table();
        conn.execute(
            "INSERT INTO practice_log (id, topic, created_at) VALUES (1, 'Basics', 'last tuesday')",
            [],
        )
        .unwrap();
        let record = load(&conn);
        assert_eq!(record.topic, "Basics");
        assert!(record.created_at.is_none());
    }

    #[test]
    fn test_count_to_sql_range() {
        assert_eq!(count_to_sql(12, "rows_returned").unwrap(), 12);
        assert!(count_to_sql(u64::MAX, "rows_returned").is_err());
    }
}
