//! Error types for store operations.
//!
//! Covers database access, query rejection and execution, export, migration
//! and the two-step delete protocol.

use std::fmt::Display;

use sql_practice_core::RejectedQuery;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite operation failure on the store's own statements.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// The query was refused before (or instead of) execution.
    #[error("rejected query: {0}")]
    RejectedQuery(#[from] RejectedQuery),

    /// The engine refused a practice query (syntax, unknown table/column, ...).
    #[error("error running query: {0}")]
    ExecutionError(String),

    /// Writing the log export failed.
    #[error("export error: {0}")]
    ExportError(String),

    /// A value could not be converted for storage.
    #[error("conversion error: {0}")]
    ConversionError(String),

    /// Schema setup or seeding failure.
    #[error("migration error: {0}")]
    MigrationError(String),

    /// The table is not part of the reference schema.
    #[error("unknown reference table: {0}")]
    UnknownTable(String),

    /// The record changed after its deletion was requested.
    #[error("record {0} changed since deletion was requested")]
    StaleConfirmation(i64),

    /// A confirmation token could not be parsed.
    #[error("invalid confirmation token: {0}")]
    InvalidToken(String),
}

impl StoreError {
    pub(crate) fn execution(err: impl Display) -> Self {
        Self::ExecutionError(err.to_string())
    }

    pub(crate) fn export(err: impl Display) -> Self {
        Self::ExportError(err.to_string())
    }
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
