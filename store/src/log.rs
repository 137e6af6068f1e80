//! The practice log.
//!
//! [`PracticeLog`] saves, lists and deletes practice records. Each save or
//! delete is a single SQL statement, and after each one the whole log is
//! mirrored to the configured export file. Export problems are reported in
//! the returned [`ExportStatus`] and logged; they never undo the change.
//!
//! # Example
//!
//! ```no_run
//! use rusqlite::Connection;
//! use sql_practice_core::{PracticeEntry, SaveMode};
//! use sql_practice_store::{LogExporter, Migration, PracticeLog};
//!
//! let conn = Connection::open("practice.db").unwrap();
//! Migration::new(&conn).initialize().unwrap();
//!
//! let log = PracticeLog::new(&conn).with_exporter(LogExporter::new("practice_log.xlsx").unwrap());
//! let entry = PracticeEntry {
//!     topic: "Joins".into(),
//!     question_title: "List employees with department".into(),
//!     query_text: "SELECT * FROM employees".into(),
//!     user_note: None,
//!     rows_returned: 12,
//!     exec_time_ms: 3,
//! };
//! let report = log.save(&entry, SaveMode::Append).unwrap();
//! println!("saved record {}", report.outcome.id());
//! ```

use rusqlite::{Connection, OptionalExtension, params};
use sql_practice_core::{PracticeEntry, PracticeRecord, SaveMode, SaveOutcome};
use tracing::{debug, info, warn};

use crate::convert::{RECORD_COLUMNS, RecordRow, count_to_sql};
use crate::error::Result;
use crate::export::{ExportStatus, LogExporter};

/// Topic filter value that means "every topic".
pub const ALL_TOPICS: &str = "All";

/// What a save did and whether the export followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub outcome: SaveOutcome,
    pub export: ExportStatus,
}

/// What a delete did and whether the export followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteReport {
    /// `false` when no record had the id.
    pub removed: bool,
    pub export: ExportStatus,
}

/// Practice log access over one connection.
pub struct PracticeLog<'a> {
    conn: &'a Connection,
    exporter: Option<LogExporter>,
}

impl<'a> PracticeLog<'a> {
    /// Creates a log without an export mirror.
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            exporter: None,
        }
    }

    /// Mirrors the log through `exporter` after every change.
    pub fn with_exporter(mut self, exporter: LogExporter) -> Self {
        self.exporter = Some(exporter);
        self
    }

    pub fn exporter(&self) -> Option<&LogExporter> {
        self.exporter.as_ref()
    }

    /// Saves a practice attempt.
    ///
    /// With [`SaveMode::Overwrite`] the most recent record for the same
    /// topic and question (highest id) gets the new query, note, row count
    /// and time; its id and `created_at` stay. When no such record exists
    /// the entry is inserted instead.
    pub fn save(&self, entry: &PracticeEntry, mode: SaveMode) -> Result<SaveReport> {
        let rows_returned = count_to_sql(entry.rows_returned, "rows_returned")?;
        let exec_time_ms = count_to_sql(entry.exec_time_ms, "exec_time_ms")?;

        let updated = match mode {
            SaveMode::Append => None,
            SaveMode::Overwrite => self
                .conn
                .query_row(
                    "UPDATE practice_log \
                     SET query_text = ?1, user_note = ?2, rows_returned = ?3, exec_time_ms = ?4 \
                     WHERE id = (SELECT id FROM practice_log \
                                 WHERE topic = ?5 AND question_title = ?6 \
                                 ORDER BY id DESC LIMIT 1) \
                     RETURNING id",
                    params![
                        entry.query_text,
                        entry.user_note,
                        rows_returned,
                        exec_time_ms,
                        entry.topic,
                        entry.question_title,
                    ],
                    |row| row.get::<_, i64>(0),
                )
                .optional()?,
        };

        let outcome = match updated {
            Some(id) => SaveOutcome::Updated(id),
            None => {
                if mode == SaveMode::Overwrite {
                    debug!(
                        topic = %entry.topic,
                        question = %entry.question_title,
                        "no earlier record to overwrite, inserting"
                    );
                }
                self.conn.execute(
                    "INSERT INTO practice_log \
                     (topic, question_title, query_text, user_note, rows_returned, exec_time_ms, created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, datetime('now'))",
                    params![
                        entry.topic,
                        entry.question_title,
                        entry.query_text,
                        entry.user_note,
                        rows_returned,
                        exec_time_ms,
                    ],
                )?;
                SaveOutcome::Inserted(self.conn.last_insert_rowid())
            }
        };

        info!(outcome = ?outcome, topic = %entry.topic, "practice saved");
        Ok(SaveReport {
            outcome,
            export: self.export(),
        })
    }

    /// Deletes one record. An unknown id is a no-op, not an error.
    pub fn delete(&self, id: i64) -> Result<DeleteReport> {
        let affected = self
            .conn
            .execute("DELETE FROM practice_log WHERE id = ?1", params![id])?;
        let removed = affected > 0;
        if removed {
            info!(id, "practice record deleted");
        } else {
            debug!(id, "no practice record to delete");
        }
        Ok(DeleteReport {
            removed,
            export: self.export(),
        })
    }

    /// Lists records newest first, optionally limited to one topic.
    ///
    /// `None` and [`ALL_TOPICS`] both mean no filter.
    pub fn fetch(&self, topic: Option<&str>) -> Result<Vec<PracticeRecord>> {
        let rows = match topic.filter(|t| *t != ALL_TOPICS) {
            Some(topic) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {RECORD_COLUMNS} FROM practice_log WHERE topic = ?1 ORDER BY id DESC"
                ))?;
                stmt.query_map(params![topic], RecordRow::from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {RECORD_COLUMNS} FROM practice_log ORDER BY id DESC"
                ))?;
                stmt.query_map([], RecordRow::from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?
            }
        };

        Ok(rows.into_iter().map(RecordRow::into_record).collect())
    }

    /// Looks up one record.
    pub fn get(&self, id: i64) -> Result<Option<PracticeRecord>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM practice_log WHERE id = ?1"),
                params![id],
                RecordRow::from_row,
            )
            .optional()?;
        Ok(row.map(RecordRow::into_record))
    }

    /// Rewrites the export file from the current log contents.
    pub fn export(&self) -> ExportStatus {
        let Some(exporter) = &self.exporter else {
            return ExportStatus::Disabled;
        };

        let result = self
            .fetch(None)
            .and_then(|records| exporter.write(&records).map(|()| records.len()));
        match result {
            Ok(rows) => {
                debug!(path = %exporter.path().display(), rows, "practice log exported");
                ExportStatus::Written {
                    path: exporter.path().to_path_buf(),
                    rows,
                }
            }
            Err(err) => {
                warn!(path = %exporter.path().display(), error = %err, "practice log export failed");
                ExportStatus::Failed(err.to_string())
            }
        }
    }
}
