//! Topic → question catalog backed by a JSON document.
//!
//! The document is a single object mapping each topic name to an ordered
//! list of questions:
//!
//! ```json
//! {
//!   "Joins": [
//!     { "title": "List employees with department", "target_tables": ["employees", "departments"] }
//!   ]
//! }
//! ```
//!
//! Topic order and question order are preserved through load → save.
//! Questions can be added at runtime; nothing is ever removed.

use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde_json::{Map, Value};
use sql_practice_core::{Question, Selection, reference_table};
use tracing::{debug, warn};

use crate::error::{CatalogError, Result};

/// In-memory question catalog.
///
/// # Examples
///
/// ```
/// use sql_practice_catalog::Catalog;
///
/// let mut catalog = Catalog::from_json_str(r#"{"Basics": [{"title": "List all orders", "target_tables": ["orders"]}]}"#).unwrap();
/// assert_eq!(catalog.topics().collect::<Vec<_>>(), vec!["Basics"]);
///
/// let selection = catalog
///     .add_question("Joins", "Orders with employee names", ["orders", "employees"])
///     .unwrap();
/// assert_eq!(selection.topic, "Joins");
/// assert!(catalog.find("Joins", "Orders with employee names").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    topics: Vec<(String, Vec<Question>)>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::IoError`] if the file cannot be read,
    /// [`CatalogError::JsonError`] on malformed JSON, or
    /// [`CatalogError::InvalidCatalog`] if the document has the wrong shape.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let value: Value = serde_json::from_reader(BufReader::new(file))?;
        let catalog = Self::from_value(value)?;
        debug!(
            path = %path.display(),
            topics = catalog.topics.len(),
            "loaded question catalog"
        );
        Ok(catalog)
    }

    /// Loads a catalog, or starts an empty one if the file does not exist.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match Self::load(path) {
            Err(CatalogError::IoError(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "question catalog not found, starting empty");
                Ok(Self::new())
            }
            other => other,
        }
    }

    /// Parses a catalog from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    fn from_value(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(CatalogError::InvalidCatalog(
                "expected an object of topic name to question list".to_string(),
            ));
        };

        let mut topics = Vec::with_capacity(map.len());
        for (topic, questions) in map {
            let questions: Vec<Question> = serde_json::from_value(questions).map_err(|e| {
                CatalogError::InvalidCatalog(format!("topic '{topic}': {e}"))
            })?;
            topics.push((topic, questions));
        }
        Ok(Self { topics })
    }

    /// Writes the whole catalog to `path` as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.to_value()?)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        debug!(path = %path.display(), "saved question catalog");
        Ok(())
    }

    /// Serializes the catalog to a pretty-printed JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_value()?)?)
    }

    fn to_value(&self) -> Result<Value> {
        let mut map = Map::with_capacity(self.topics.len());
        for (topic, questions) in &self.topics {
            map.insert(topic.clone(), serde_json::to_value(questions)?);
        }
        Ok(Value::Object(map))
    }

    /// Returns topic names in catalog order.
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(|(topic, _)| topic.as_str())
    }

    /// Returns `true` if the catalog has a topic with this exact name.
    pub fn contains_topic(&self, topic: &str) -> bool {
        self.questions(topic).is_some()
    }

    /// Returns the questions of a topic in catalog order.
    pub fn questions(&self, topic: &str) -> Option<&[Question]> {
        self.topics
            .iter()
            .find(|(name, _)| name == topic)
            .map(|(_, questions)| questions.as_slice())
    }

    /// Looks up a question by topic and exact title.
    pub fn find(&self, topic: &str, title: &str) -> Option<&Question> {
        self.questions(topic)?.iter().find(|q| q.title == title)
    }

    /// Number of topics.
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Returns `true` if the catalog has no topics.
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Adds a question, creating the topic if needed.
    ///
    /// Topic and title are trimmed. Returns the selection pointing at the new
    /// question so a front end can switch to it.
    ///
    /// # Errors
    ///
    /// [`CatalogError::EmptyTopic`], [`CatalogError::EmptyQuestion`],
    /// [`CatalogError::UnknownTable`] for a table outside the reference
    /// schema, or [`CatalogError::DuplicateQuestion`].
    pub fn add_question<I, S>(&mut self, topic: &str, title: &str, target_tables: I) -> Result<Selection>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let topic = topic.trim();
        let title = title.trim();
        if topic.is_empty() {
            return Err(CatalogError::EmptyTopic);
        }
        if title.is_empty() {
            return Err(CatalogError::EmptyQuestion);
        }

        let tables: Vec<String> = target_tables.into_iter().map(Into::into).collect();
        if let Some(unknown) = tables.iter().find(|t| reference_table(t).is_none()) {
            return Err(CatalogError::UnknownTable(unknown.clone()));
        }

        if self.find(topic, title).is_some() {
            return Err(CatalogError::DuplicateQuestion {
                topic: topic.to_string(),
                title: title.to_string(),
            });
        }

        let question = Question::new(title, tables);
        match self.topics.iter_mut().find(|(name, _)| name == topic) {
            Some((_, questions)) => questions.push(question),
            None => self.topics.push((topic.to_string(), vec![question])),
        }

        Ok(Selection::new(topic, title))
    }
}
