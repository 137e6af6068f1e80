//! Core types for the SQL practice tool.
//!
//! This crate holds the plain data shared by the catalog, the SQLite store
//! and the command-line front end:
//!
//! - [`PracticeRecord`], [`PracticeEntry`], [`SaveMode`], [`SaveOutcome`] —
//!   the practice log model.
//! - [`Question`] and [`REFERENCE_TABLES`] — catalog entries and the fixed
//!   schema practice queries run against.
//! - [`ResultSet`], [`CellValue`], [`QueryRun`] — query results.
//! - [`validate_select`] — the read-only gate in front of the executor.
//! - [`PracticeSession`] — explicit editor/selection/last-run state.
//!
//! # Example
//!
//! ```
//! use sql_practice_core::*;
//!
//! assert!(validate_select("SELECT * FROM orders").is_ok());
//! assert!(validate_select("DELETE FROM orders").is_err());
//!
//! let mut session = PracticeSession::new();
//! session.select(Selection::new("Basics", "List all orders"));
//! session.set_editor("SELECT * FROM orders");
//! session.record_run(RunSummary { rows_returned: 12, exec_time_ms: 0 });
//! assert_eq!(session.save_entry("").unwrap().rows_returned, 12);
//! ```

mod result;
mod session;
mod types;
mod validate;

pub use result::{CellValue, QueryRun, ResultSet};
pub use session::{PendingLoad, PracticeSession, RunSummary, Selection, SessionError};
pub use types::*;
pub use validate::{RejectedQuery, validate_select};
