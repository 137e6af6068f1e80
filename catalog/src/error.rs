//! Error types for catalog and configuration operations.

use thiserror::Error;

/// Errors that can occur while loading, editing or saving the catalog or
/// the configuration.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The catalog document is not an object of topic → question list.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Topic name is empty or whitespace-only.
    #[error("topic name cannot be empty")]
    EmptyTopic,

    /// Question text is empty or whitespace-only.
    #[error("question text cannot be empty")]
    EmptyQuestion,

    /// The topic already lists a question with the same title.
    #[error("topic '{topic}' already has question '{title}'")]
    DuplicateQuestion { topic: String, title: String },

    /// A target table is not part of the reference schema.
    #[error("unknown target table: {0}")]
    UnknownTable(String),
}

/// Convenience alias for results with [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;
