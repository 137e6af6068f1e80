//! SQLite backend for the SQL practice tool.
//!
//! This crate owns the practice database: the seeded reference tables
//! (`departments`, `employees`, `orders`), read-only execution of practice
//! queries, and the persistent practice log with its spreadsheet mirror.
//!
//! # Quick start
//!
//! ```no_run
//! use sql_practice_core::{PracticeEntry, SaveMode};
//! use sql_practice_store::{Database, LogExporter, PracticeLog, QueryExecutor};
//!
//! let db = Database::new("practice.db");
//! db.initialize().unwrap();
//!
//! db.with_connection(|conn| {
//!     let run = QueryExecutor::new(conn).execute("SELECT * FROM departments")?;
//!
//!     let log = PracticeLog::new(conn).with_exporter(LogExporter::new("practice_log.xlsx")?);
//!     let entry = PracticeEntry {
//!         topic: "Basics".into(),
//!         question_title: "List all departments".into(),
//!         query_text: "SELECT * FROM departments".into(),
//!         user_note: None,
//!         rows_returned: run.row_count as u64,
//!         exec_time_ms: run.elapsed_ms,
//!     };
//!     let report = log.save(&entry, SaveMode::Append)?;
//!     println!("saved record {}", report.outcome.id());
//!     Ok(())
//! })
//! .unwrap();
//! ```

mod browser;
mod convert;
mod database;
mod error;
mod executor;
mod export;
mod log;
mod migration;
mod schema;

pub use browser::{ConfirmationToken, DeleteOutcome, LogBrowser};
pub use database::Database;
pub use error::{Result, StoreError};
pub use executor::QueryExecutor;
pub use export::{ExportFormat, ExportStatus, LogExporter, write_records_csv, write_result_csv};
pub use log::{ALL_TOPICS, DeleteReport, PracticeLog, SaveReport};
pub use migration::{InitReport, Migration, MigrationStatus, TableCount};
pub use schema::{SEED_DEPARTMENTS, SEED_EMPLOYEES, SEED_ORDERS};
