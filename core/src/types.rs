//! Data model for practice records, catalog questions and the reference schema.
//!
//! The types are plain data with [`serde`] support so they can be printed as
//! JSON by the command-line front end and read back from the question
//! catalog document.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// Storage format of [`PracticeRecord::created_at`] (SQLite `datetime('now')`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column order of the practice log in exports and listings.
pub const LOG_COLUMNS: [&str; 8] = [
    "id",
    "topic",
    "question_title",
    "query_text",
    "user_note",
    "rows_returned",
    "exec_time_ms",
    "created_at",
];

/// A table of the fixed reference schema that practice queries run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceTable {
    /// Table name.
    pub name: &'static str,
    /// Column names in declaration order.
    pub columns: &'static [&'static str],
}

/// The read-only reference schema, in seeding order.
pub const REFERENCE_TABLES: [ReferenceTable; 3] = [
    ReferenceTable {
        name: "departments",
        columns: &["id", "dept_name", "location"],
    },
    ReferenceTable {
        name: "employees",
        columns: &["id", "name", "dept_id", "salary", "hire_date", "email"],
    },
    ReferenceTable {
        name: "orders",
        columns: &[
            "order_id",
            "customer_name",
            "order_date",
            "amount",
            "employee_id",
            "status",
        ],
    },
];

/// Looks up a reference table by exact name.
///
/// # Examples
///
/// ```
/// use sql_practice_core::reference_table;
///
/// assert_eq!(reference_table("orders").unwrap().columns.len(), 6);
/// assert!(reference_table("practice_log").is_none());
/// ```
pub fn reference_table(name: &str) -> Option<&'static ReferenceTable> {
    REFERENCE_TABLES.iter().find(|table| table.name == name)
}

/// One saved practice attempt as persisted in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeRecord {
    /// Monotonically assigned identifier.
    pub id: i64,
    /// Topic the question belongs to.
    pub topic: String,
    /// Display text of the practiced question.
    pub question_title: String,
    /// Exact SQL text that was run.
    pub query_text: String,
    /// Optional free-text annotation.
    pub user_note: Option<String>,
    /// Rows produced by the run that was saved.
    pub rows_returned: u64,
    /// Wall-clock execution time of that run.
    pub exec_time_ms: u64,
    /// Insertion time (UTC). `None` for rows written before the column existed.
    pub created_at: Option<NaiveDateTime>,
}

impl PracticeRecord {
    /// Formats `created_at` the way it is stored, or an empty string.
    pub fn created_at_display(&self) -> String {
        self.created_at
            .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default()
    }

    /// Returns the note, treating a missing note as empty.
    pub fn note(&self) -> &str {
        self.user_note.as_deref().unwrap_or("")
    }
}

/// Input of a save into the practice log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeEntry {
    pub topic: String,
    pub question_title: String,
    pub query_text: String,
    pub user_note: Option<String>,
    pub rows_returned: u64,
    pub exec_time_ms: u64,
}

/// How a save treats earlier records for the same question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SaveMode {
    /// Always insert a new record.
    #[default]
    Append,
    /// Update the most recent record for the same (topic, question), or
    /// insert when there is none.
    Overwrite,
}

/// Result of a save into the practice log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveOutcome {
    /// A new record was created.
    Inserted(i64),
    /// An existing record was updated in place.
    Updated(i64),
}

impl SaveOutcome {
    /// Returns the id of the affected record.
    pub fn id(&self) -> i64 {
        match self {
            Self::Inserted(id) | Self::Updated(id) => *id,
        }
    }
}

/// A practice question from the catalog.
///
/// # Examples
///
/// ```
/// use sql_practice_core::Question;
///
/// let q: Question = serde_json::from_str(r#"{"title": "List all orders"}"#).unwrap();
/// assert!(q.target_tables.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question text, unique within its topic.
    pub title: String,
    /// Reference tables the question is about, without duplicates.
    #[serde(default, deserialize_with = "deserialize_tables")]
    pub target_tables: Vec<String>,
}

impl Question {
    /// Creates a question, dropping duplicate table names.
    pub fn new(title: impl Into<String>, target_tables: impl IntoIterator<Item = String>) -> Self {
        Self {
            title: title.into(),
            target_tables: unique_tables(target_tables),
        }
    }
}

/// Keeps the first occurrence of each table name.
fn unique_tables(tables: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for table in tables {
        if !unique.contains(&table) {
            unique.push(table);
        }
    }
    unique
}

fn deserialize_tables<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<String>::deserialize(deserializer).map(unique_tables)
}
