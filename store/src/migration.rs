//! Schema setup and seeding.
//!
//! [`Migration::initialize`] is meant to run on every process start: it
//! creates missing tables, seeds the reference data once, and adds any
//! practice log column an older database lacks.
//!
//! # Example
//!
//! ```no_run
//! use rusqlite::Connection;
//! use sql_practice_store::Migration;
//!
//! let conn = Connection::open("practice.db").unwrap();
//! let report = Migration::new(&conn).initialize().unwrap();
//! if report.seeded {
//!     println!("reference tables seeded");
//! }
//! ```

use std::collections::HashSet;

use rusqlite::Connection;
use sql_practice_core::REFERENCE_TABLES;
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::schema::{INDEX_SQL, LOG_COLUMN_TYPES, LOG_TABLE, SCHEMA_SQL, SEED_SQL};

/// Idempotent schema and seed management for one connection.
pub struct Migration<'a> {
    conn: &'a Connection,
}

impl<'a> Migration<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Creates tables, seeds reference data if needed and completes the
    /// practice log columns.
    pub fn initialize(&self) -> Result<InitReport> {
        self.up()?;
        let seeded = self.seed_if_empty()?;
        let added_columns = self.ensure_log_columns()?;
        self.conn
            .execute_batch(INDEX_SQL)
            .map_err(|e| StoreError::MigrationError(format!("failed to create indexes: {e}")))?;

        info!(seeded, added_columns = ?added_columns, "database initialized");
        Ok(InitReport {
            seeded,
            added_columns,
        })
    }

    /// Creates all tables that do not exist yet.
    ///
    /// Executes within a transaction for atomicity.
    pub fn up(&self) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(SCHEMA_SQL)
            .map_err(|e| StoreError::MigrationError(format!("failed to create tables: {e}")))?;
        tx.commit()?;
        Ok(())
    }

    /// Inserts the reference data when `departments` is empty.
    ///
    /// Returns `true` if seeding ran.
    pub fn seed_if_empty(&self) -> Result<bool> {
        if self.count_rows("departments")? > 0 {
            debug!("reference data present, skipping seed");
            return Ok(false);
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(SEED_SQL)
            .map_err(|e| StoreError::MigrationError(format!("failed to seed reference data: {e}")))?;
        tx.commit()?;
        Ok(true)
    }

    /// Adds every expected practice log column that is missing.
    ///
    /// Returns the names of the added columns. Existing columns are never
    /// altered or dropped.
    pub fn ensure_log_columns(&self) -> Result<Vec<String>> {
        let existing = self.column_names(LOG_TABLE)?;
        let mut added = Vec::new();

        for (column, sql_type) in LOG_COLUMN_TYPES {
            if existing.contains(column) {
                continue;
            }
            self.conn
                .execute(
                    &format!("ALTER TABLE {LOG_TABLE} ADD COLUMN {column} {sql_type}"),
                    [],
                )
                .map_err(|e| {
                    StoreError::MigrationError(format!("failed to add column {column}: {e}"))
                })?;
            info!(column, "added missing practice log column");
            added.push(column.to_string());
        }

        Ok(added)
    }

    /// Returns whether the tables exist and how many rows each holds.
    pub fn status(&self) -> Result<MigrationStatus> {
        let mut table_counts = Vec::with_capacity(REFERENCE_TABLES.len() + 1);
        let tables = REFERENCE_TABLES
            .iter()
            .map(|t| t.name)
            .chain(std::iter::once(LOG_TABLE));

        for table in tables {
            let count = if self.table_exists(table)? {
                Some(self.count_rows(table)?)
            } else {
                None
            };
            table_counts.push(TableCount {
                table: table.to_string(),
                rows: count,
            });
        }

        Ok(MigrationStatus {
            tables_exist: table_counts.iter().all(|t| t.rows.is_some()),
            table_counts,
        })
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare("SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1")?;
        let count: i64 = stmt.query_row([table], |row| row.get(0))?;
        Ok(count > 0)
    }

    fn count_rows(&self, table: &str) -> Result<usize> {
        let mut stmt = self.conn.prepare(&format!("SELECT COUNT(*) FROM {table}"))?;
        let count: i64 = stmt.query_row([], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn column_names(&self, table: &str) -> Result<HashSet<String>> {
        let mut stmt = self.conn.prepare(&format!("PRAGMA table_info({table})"))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<std::result::Result<HashSet<_>, _>>()?;
        Ok(names)
    }
}

/// What [`Migration::initialize`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    /// Whether the reference data was inserted.
    pub seeded: bool,
    /// Practice log columns that had to be added.
    pub added_columns: Vec<String>,
}

/// Row count of one table; `None` when the table does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCount {
    pub table: String,
    pub rows: Option<usize>,
}

/// Snapshot returned by [`Migration::status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Whether every reference table and the practice log exist.
    pub tables_exist: bool,
    /// Counts for the reference tables followed by the practice log.
    pub table_counts: Vec<TableCount>,
}

impl MigrationStatus {
    /// Row count of `table`, if it exists.
    pub fn rows(&self, table: &str) -> Option<usize> {
        self.table_counts
            .iter()
            .find(|t| t.table == table)
            .and_then(|t| t.rows)
    }
}
