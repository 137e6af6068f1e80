//! Reviewing the practice log.
//!
//! [`LogBrowser`] lists saved records and offers two actions per record:
//! loading it back into the editor ([`LogBrowser::load`]) and deleting it.
//! Deletion takes two steps. [`LogBrowser::request_delete`] returns a
//! [`ConfirmationToken`] bound to the record's current contents, and
//! [`LogBrowser::confirm_delete`] only removes the record if it is unchanged.
//! Cancelling is simply dropping the token.
//!
//! # Example
//!
//! ```no_run
//! use rusqlite::Connection;
//! use sql_practice_catalog::Catalog;
//! use sql_practice_store::{DeleteOutcome, LogBrowser, PracticeLog};
//!
//! let conn = Connection::open("practice.db").unwrap();
//! let catalog = Catalog::load("topics/questions.json").unwrap();
//! let browser = LogBrowser::new(PracticeLog::new(&conn), &catalog);
//!
//! if let Some(token) = browser.request_delete(3).unwrap() {
//!     // Show "Delete this saved query?" and wait for the user.
//!     match browser.confirm_delete(&token).unwrap() {
//!         DeleteOutcome::Deleted { .. } => println!("deleted"),
//!         DeleteOutcome::AlreadyGone => println!("nothing to delete"),
//!     }
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256};
use sql_practice_catalog::Catalog;
use sql_practice_core::{PendingLoad, PracticeRecord};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::export::ExportStatus;
use crate::log::PracticeLog;

/// Proof that deletion of a record was requested, and of what it held then.
///
/// Renders as `<id>:<sha256 hex>` so a front end can hand it back later.
///
/// # Examples
///
/// ```
/// use sql_practice_store::ConfirmationToken;
///
/// let raw = format!("7:{}", "ab".repeat(32));
/// let token: ConfirmationToken = raw.parse().unwrap();
/// assert_eq!(token.id(), 7);
/// assert_eq!(token.to_string(), raw);
/// assert!("7:nothex".parse::<ConfirmationToken>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationToken {
    id: i64,
    fingerprint: String,
}

impl ConfirmationToken {
    fn for_record(record: &PracticeRecord) -> Self {
        Self {
            id: record.id,
            fingerprint: fingerprint(record),
        }
    }

    /// Id of the record the token refers to.
    pub fn id(&self) -> i64 {
        self.id
    }

    fn matches(&self, record: &PracticeRecord) -> bool {
        self.id == record.id && self.fingerprint == fingerprint(record)
    }
}

impl fmt::Display for ConfirmationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.fingerprint)
    }
}

impl FromStr for ConfirmationToken {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || StoreError::InvalidToken(s.to_string());
        let (id, fingerprint) = s.trim().split_once(':').ok_or_else(invalid)?;
        let id = id.parse::<i64>().map_err(|_| invalid())?;
        if fingerprint.len() != 64 || !fingerprint.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        Ok(Self {
            id,
            fingerprint: fingerprint.to_ascii_lowercase(),
        })
    }
}

/// SHA-256 over every persisted field, length-prefixed so field boundaries
/// cannot shift.
fn fingerprint(record: &PracticeRecord) -> String {
    let mut hasher = Sha256::new();
    hasher.update(record.id.to_le_bytes());
    for field in [
        record.topic.as_str(),
        record.question_title.as_str(),
        record.query_text.as_str(),
        record.note(),
        record.created_at_display().as_str(),
    ] {
        hasher.update((field.len() as u64).to_le_bytes());
        hasher.update(field.as_bytes());
    }
    hasher.update(record.rows_returned.to_le_bytes());
    hasher.update(record.exec_time_ms.to_le_bytes());
    format!("{:x}", hasher.finalize())
}

/// Result of [`LogBrowser::confirm_delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The record was removed and the export refreshed.
    Deleted { export: ExportStatus },
    /// The record no longer existed; nothing changed.
    AlreadyGone,
}

/// Read access to the log plus the load and delete actions.
pub struct LogBrowser<'a> {
    log: PracticeLog<'a>,
    catalog: &'a Catalog,
}

impl<'a> LogBrowser<'a> {
    pub fn new(log: PracticeLog<'a>, catalog: &'a Catalog) -> Self {
        Self { log, catalog }
    }

    pub fn log(&self) -> &PracticeLog<'a> {
        &self.log
    }

    /// Records to display, newest first.
    pub fn entries(&self, topic: Option<&str>) -> Result<Vec<PracticeRecord>> {
        self.log.fetch(topic)
    }

    /// Prepares a record for the editor.
    ///
    /// The topic is only carried over if the catalog still has it, and the
    /// question only if that topic still lists it.
    pub fn load(&self, id: i64) -> Result<Option<PendingLoad>> {
        let Some(record) = self.log.get(id)? else {
            return Ok(None);
        };

        let topic = self
            .catalog
            .contains_topic(&record.topic)
            .then(|| record.topic.clone());
        let question_title = topic
            .as_ref()
            .and_then(|t| self.catalog.find(t, &record.question_title))
            .map(|q| q.title.clone());

        Ok(Some(PendingLoad {
            query_text: record.query_text,
            topic,
            question_title,
        }))
    }

    /// First step of a delete. Returns `None` if the record does not exist.
    pub fn request_delete(&self, id: i64) -> Result<Option<ConfirmationToken>> {
        let token = self.log.get(id)?.map(|r| ConfirmationToken::for_record(&r));
        debug!(id, armed = token.is_some(), "delete requested");
        Ok(token)
    }

    /// Second step of a delete.
    ///
    /// # Errors
    ///
    /// [`StoreError::StaleConfirmation`] if the record was modified after
    /// the token was issued; the record is left in place.
    pub fn confirm_delete(&self, token: &ConfirmationToken) -> Result<DeleteOutcome> {
        let Some(record) = self.log.get(token.id)? else {
            return Ok(DeleteOutcome::AlreadyGone);
        };
        if !token.matches(&record) {
            return Err(StoreError::StaleConfirmation(token.id));
        }

        let report = self.log.delete(token.id)?;
        if report.removed {
            Ok(DeleteOutcome::Deleted {
                export: report.export,
            })
        } else {
            Ok(DeleteOutcome::AlreadyGone)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::Migration;
    use rusqlite::Connection;
    use sql_practice_core::{PracticeEntry, SaveMode};

    fn setup() -> (Connection, Catalog) {
        let conn = Connection::open_in_memory().unwrap();
        Migration::new(&conn).initialize().unwrap();
        let catalog = Catalog::from_json_str(
            r#"{"Joins": [{"title": "List employees with department", "target_tables": ["employees"]}]}"#,
        )
        .unwrap();
        (conn, catalog)
    }

    fn save(log: &PracticeLog<'_>, topic: &str, question: &str, query: &str, mode: SaveMode) -> i64 {
        let entry = PracticeEntry {
            topic: topic.into(),
            question_title: question.into(),
            query_text: query.into(),
            user_note: None,
            rows_returned: 1,
            exec_time_ms: 1,
        };
        log.save(&entry, mode).unwrap().outcome.id()
    }

    #[test]
    fn test_load_known_question() {
        let (conn, catalog) = setup();
        let browser = LogBrowser::new(PracticeLog::new(&conn), &catalog);
        let id = save(
            browser.log(),
            "Joins",
            "List employees with department",
            "SELECT * FROM employees",
            SaveMode::Append,
        );

        let pending = browser.load(id).unwrap().unwrap();
        assert_eq!(pending.query_text, "SELECT * FROM employees");
        assert_eq!(pending.topic.as_deref(), Some("Joins"));
        assert_eq!(
            pending.question_title.as_deref(),
            Some("List employees with department")
        );
    }

    #[test]
    fn test_load_unknown_question_and_topic() {
        let (conn, catalog) = setup();
        let browser = LogBrowser::new(PracticeLog::new(&conn), &catalog);
        let unknown_question = save(browser.log(), "Joins", "Gone", "SELECT 1", SaveMode::Append);
        let unknown_topic = save(browser.log(), "Old", "Gone", "SELECT 2", SaveMode::Append);

        let pending = browser.load(unknown_question).unwrap().unwrap();
        assert_eq!(pending.topic.as_deref(), Some("Joins"));
        assert_eq!(pending.question_title, None);

        let pending = browser.load(unknown_topic).unwrap().unwrap();
        assert_eq!(pending.topic, None);
        assert_eq!(pending.question_title, None);

        assert!(browser.load(999).unwrap().is_none());
    }

    #[test]
    fn test_two_step_delete() {
        let (conn, catalog) = setup();
        let browser = LogBrowser::new(PracticeLog::new(&conn), &catalog);
        let id = save(browser.log(), "Joins", "Q", "SELECT 1", SaveMode::Append);

        let token = browser.request_delete(id).unwrap().unwrap();
        assert_eq!(token.id(), id);
        assert_eq!(browser.entries(None).unwrap().len(), 1);

        assert!(matches!(
            browser.confirm_delete(&token).unwrap(),
            DeleteOutcome::Deleted { export: ExportStatus::Disabled }
        ));
        assert!(browser.entries(None).unwrap().is_empty());
        assert_eq!(
            browser.confirm_delete(&token).unwrap(),
            DeleteOutcome::AlreadyGone
        );
    }

    #[test]
    fn test_cancel_keeps_record() {
        let (conn, catalog) = setup();
        let browser = LogBrowser::new(PracticeLog::new(&conn), &catalog);
        let id = save(browser.log(), "Joins", "Q", "SELECT 1", SaveMode::Append);

        let token = browser.request_delete(id).unwrap().unwrap();
        drop(token);
        assert_eq!(browser.entries(None).unwrap().len(), 1);
    }

    #[test]
    fn test_request_delete_missing_record() {
        let (conn, catalog) = setup();
        let browser = LogBrowser::new(PracticeLog::new(&conn), &catalog);
        assert!(browser.request_delete(5).unwrap().is_none());
    }

    #[test]
    fn test_stale_token_refused_after_overwrite() {
        let (conn, catalog) = setup();
        let browser = LogBrowser::new(PracticeLog::new(&conn), &catalog);
        let id = save(browser.log(), "Joins", "Q", "SELECT 1", SaveMode::Append);
        let token = browser.request_delete(id).unwrap().unwrap();

        save(browser.log(), "Joins", "Q", "SELECT 2", SaveMode::Overwrite);
        assert!(matches!(
            browser.confirm_delete(&token),
            Err(StoreError::StaleConfirmation(stale)) if stale == id
        ));
        assert_eq!(browser.entries(None).unwrap().len(), 1);
    }

    #[test]
    fn test_token_roundtrip_through_string() {
        let (conn, catalog) = setup();
        let browser = LogBrowser::new(PracticeLog::new(&conn), &catalog);
        let id = save(browser.log(), "Joins", "Q", "SELECT 1", SaveMode::Append);

        let token = browser.request_delete(id).unwrap().unwrap();
        let parsed: ConfirmationToken = token.to_string().parse().unwrap();
        assert_eq!(parsed, token);
        assert!(matches!(
            browser.confirm_delete(&parsed).unwrap(),
            DeleteOutcome::Deleted { .. }
        ));
    }

    #[test]
    fn test_malformed_tokens() {
        for raw in ["", "12", "x:abc", "3:abc", &format!("3:{}", "g".repeat(64))] {
            assert!(
                matches!(raw.parse::<ConfirmationToken>(), Err(StoreError::InvalidToken(_))),
                "{raw}"
            );
        }
    }
}
