//! Question catalog and configuration for the SQL practice tool.
//!
//! - [`Catalog`] — the topic → question list read from a JSON document,
//!   editable at runtime and optionally written back.
//! - [`PracticeConfig`] — YAML configuration naming the database, catalog
//!   and export files.
//!
//! # Quick start
//!
//! ```no_run
//! use sql_practice_catalog::{Catalog, PracticeConfig};
//!
//! let config = PracticeConfig::load_or_default("sql-practice.yml").unwrap();
//! let mut catalog = Catalog::load(&config.catalog).unwrap();
//!
//! for topic in catalog.topics() {
//!     println!("{topic}");
//! }
//!
//! catalog
//!     .add_question("Joins", "Orders with employee names", ["orders", "employees"])
//!     .unwrap();
//! catalog.save(&config.catalog).unwrap();
//! ```

mod catalog;
mod config;
mod error;

pub use catalog::Catalog;
pub use config::{
    DEFAULT_CATALOG, DEFAULT_DATABASE, DEFAULT_EXPORT, DEFAULT_SAMPLE_ROWS, PracticeConfig,
};
pub use error::{CatalogError, Result};
