//! Database file handle.
//!
//! Every user action opens its own connection and closes it when done, so no
//! connection outlives the operation that needed it.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::migration::{InitReport, Migration};

/// Location of the practice database.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a new connection, creating the file and its parent directory
    /// if needed.
    pub fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::MigrationError(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        debug!(path = %self.path.display(), "opened database");
        Ok(conn)
    }

    /// Runs `f` on a fresh connection and closes it afterwards.
    pub fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.open()?;
        let result = f(&conn);
        if let Err((_, err)) = conn.close() {
            warn!(path = %self.path.display(), error = %err, "failed to close database");
        }
        result
    }

    /// Creates the schema, seeds the reference tables if empty and upgrades
    /// the practice log.
    pub fn initialize(&self) -> Result<InitReport> {
        self.with_connection(|conn| Migration::new(conn).initialize())
    }
}
