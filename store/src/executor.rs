//! Read-only execution of practice queries.
//!
//! [`QueryExecutor::execute`] validates the text with
//! [`validate_select`](sql_practice_core::validate_select) before touching
//! the connection, then runs the statement and collects every row. Engine
//! failures are reported as [`StoreError::ExecutionError`] with SQLite's
//! message. There is no timeout and no cap on the number of rows returned.
//!
//! # Example
//!
//! ```no_run
//! use rusqlite::Connection;
//! use sql_practice_store::{Migration, QueryExecutor};
//!
//! let conn = Connection::open("practice.db").unwrap();
//! Migration::new(&conn).initialize().unwrap();
//!
//! let run = QueryExecutor::new(&conn)
//!     .execute("SELECT name, salary FROM employees ORDER BY salary DESC")
//!     .unwrap();
//! println!("{} rows ({} ms)", run.row_count, run.elapsed_ms);
//! ```

use std::time::Instant;

use rusqlite::Connection;
use sql_practice_core::{QueryRun, RejectedQuery, ResultSet, reference_table, validate_select};
use tracing::debug;

use crate::convert::cell_value;
use crate::error::{Result, StoreError};

/// Runs validated `SELECT` statements against the reference data.
pub struct QueryExecutor<'a> {
    conn: &'a Connection,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Validates and runs `query`, returning all rows and the elapsed time.
    ///
    /// # Errors
    ///
    /// [`StoreError::RejectedQuery`] if the text is not a single `SELECT`
    /// (nothing is sent to the database in that case, except for the
    /// read-only check which happens after preparation), or
    /// [`StoreError::ExecutionError`] if SQLite refuses it.
    pub fn execute(&self, query: &str) -> Result<QueryRun> {
        validate_select(query)?;
        let query = query.trim();

        let started = Instant::now();
        let mut stmt = self.conn.prepare(query).map_err(StoreError::execution)?;
        if !stmt.readonly() {
            return Err(RejectedQuery::NotReadOnly.into());
        }

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let column_count = columns.len();

        let mut rows = stmt.query([]).map_err(StoreError::execution)?;
        let mut collected = Vec::new();
        while let Some(row) = rows.next().map_err(StoreError::execution)? {
            let cells = (0..column_count)
                .map(|idx| row.get_ref(idx).map(cell_value))
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(StoreError::execution)?;
            collected.push(cells);
        }
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let row_count = collected.len();
        debug!(row_count, elapsed_ms, "query executed");
        Ok(QueryRun {
            result: ResultSet {
                columns,
                rows: collected,
            },
            row_count,
            elapsed_ms,
        })
    }

    /// Returns the first `limit` rows of a reference table.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownTable`] if `table` is not one of the reference
    /// tables.
    pub fn sample(&self, table: &str, limit: usize) -> Result<ResultSet> {
        let table = reference_table(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))?;
        let run = self.execute(&format!("SELECT * FROM {} LIMIT {limit}", table.name))?;
        Ok(run.result)
    }
}
