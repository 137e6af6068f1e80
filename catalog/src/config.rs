//! Application configuration.
//!
//! Defines where the practice database, question catalog and log export
//! live. Loaded from YAML; every field is optional and falls back to the
//! defaults below.
//!
//! # Example YAML
//!
//! ```yaml
//! database: practice.db
//! catalog: topics/questions.json
//! export: practice_log.xlsx   # null disables the export
//! sample_rows: 5
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Default SQLite database file.
pub const DEFAULT_DATABASE: &str = "practice.db";
/// Default question catalog document.
pub const DEFAULT_CATALOG: &str = "topics/questions.json";
/// Default practice log export.
pub const DEFAULT_EXPORT: &str = "practice_log.xlsx";
/// Default number of sample rows shown per reference table.
pub const DEFAULT_SAMPLE_ROWS: usize = 5;

/// File locations and display settings.
///
/// # Examples
///
/// ```
/// use sql_practice_catalog::PracticeConfig;
///
/// let config: PracticeConfig = serde_yaml::from_str("database: /tmp/p.db\nexport: null\n").unwrap();
/// assert_eq!(config.database.to_str(), Some("/tmp/p.db"));
/// assert!(config.export.is_none());
/// assert_eq!(config.sample_rows, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeConfig {
    /// SQLite database holding the reference tables and the practice log.
    pub database: PathBuf,
    /// JSON question catalog.
    pub catalog: PathBuf,
    /// Spreadsheet mirror of the practice log (`.xlsx` or `.csv`); `None`
    /// disables it.
    pub export: Option<PathBuf>,
    /// Rows shown per table by the schema reference view.
    pub sample_rows: usize,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            catalog: PathBuf::from(DEFAULT_CATALOG),
            export: Some(PathBuf::from(DEFAULT_EXPORT)),
            sample_rows: DEFAULT_SAMPLE_ROWS,
        }
    }
}

impl PracticeConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::CatalogError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::CatalogError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let config = serde_yaml::from_reader(BufReader::new(file))?;
        debug!(path = %path.as_ref().display(), "loaded configuration");
        Ok(config)
    }

    /// Loads configuration, using defaults when the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "no configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }
}
