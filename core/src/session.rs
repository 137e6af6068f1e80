//! Practice session state.
//!
//! A [`PracticeSession`] carries everything the practice view needs between
//! interactions: the selected question, the editor text and the summary of
//! the last successful run. Front ends pass it explicitly instead of keeping
//! ambient flags, and hand log records to it as a [`PendingLoad`].
//!
//! # Examples
//!
//! ```
//! use sql_practice_core::{PracticeSession, RunSummary, Selection, SessionError};
//!
//! let mut session = PracticeSession::new();
//! session.select(Selection::new("Joins", "List employees with department"));
//! session.set_editor("SELECT * FROM employees");
//! assert_eq!(session.save_entry(""), Err(SessionError::NoSuccessfulRun));
//!
//! session.record_run(RunSummary { rows_returned: 10, exec_time_ms: 3 });
//! let entry = session.save_entry("first try").unwrap();
//! assert_eq!(entry.rows_returned, 10);
//! assert_eq!(entry.user_note.as_deref(), Some("first try"));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::PracticeEntry;

/// Errors raised by session transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No question is selected.
    #[error("select a topic and question first")]
    NoSelection,
    /// Saving requires a successful run of the current editor text.
    #[error("run a successful query first")]
    NoSuccessfulRun,
}

/// The question a session is working on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub topic: String,
    pub question_title: String,
}

impl Selection {
    pub fn new(topic: impl Into<String>, question_title: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            question_title: question_title.into(),
        }
    }
}

/// Outcome of the last successful run, as recorded at save time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub rows_returned: u64,
    pub exec_time_ms: u64,
}

/// A log record handed back to the editor.
///
/// `topic` and `question_title` are only present when the catalog still
/// knows them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLoad {
    pub query_text: String,
    pub topic: Option<String>,
    pub question_title: Option<String>,
}

/// Editor, selection and last-run state of one practice session.
#[derive(Debug, Clone, Default)]
pub struct PracticeSession {
    topic: Option<String>,
    selection: Option<Selection>,
    editor: String,
    last_run: Option<RunSummary>,
}

impl PracticeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a question. Switching question forgets the last run.
    pub fn select(&mut self, selection: Selection) {
        if self.selection.as_ref() != Some(&selection) {
            self.last_run = None;
        }
        self.topic = Some(selection.topic.clone());
        self.selection = Some(selection);
    }

    /// Switches topic without choosing a question. A question from another
    /// topic is deselected.
    pub fn select_topic(&mut self, topic: impl Into<String>) {
        let topic = topic.into();
        if self.selection.as_ref().is_some_and(|s| s.topic != topic) {
            self.selection = None;
            self.last_run = None;
        }
        self.topic = Some(topic);
    }

    /// The current topic, set by [`select`](Self::select) or
    /// [`select_topic`](Self::select_topic).
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Replaces the editor text. Changing the text forgets the last run.
    pub fn set_editor(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.editor {
            self.last_run = None;
        }
        self.editor = text;
    }

    pub fn editor(&self) -> &str {
        &self.editor
    }

    pub fn record_run(&mut self, summary: RunSummary) {
        self.last_run = Some(summary);
    }

    pub fn record_failure(&mut self) {
        self.last_run = None;
    }

    pub fn last_run(&self) -> Option<RunSummary> {
        self.last_run
    }

    /// Loads a record from the log into the editor.
    ///
    /// A known topic is switched to even when its question is gone; an
    /// unknown topic leaves the selection alone.
    pub fn apply_pending(&mut self, pending: PendingLoad) {
        match (pending.topic, pending.question_title) {
            (Some(topic), Some(question)) => self.select(Selection::new(topic, question)),
            (Some(topic), None) => self.select_topic(topic),
            (None, _) => {}
        }
        self.set_editor(pending.query_text);
    }

    /// Builds the log entry for the current editor text and last run.
    ///
    /// An empty or whitespace-only note is stored as no note.
    pub fn save_entry(&self, note: &str) -> Result<PracticeEntry, SessionError> {
        let selection = self.selection.as_ref().ok_or(SessionError::NoSelection)?;
        let run = self.last_run.ok_or(SessionError::NoSuccessfulRun)?;
        let note = note.trim();
        Ok(PracticeEntry {
            topic: selection.topic.clone(),
            question_title: selection.question_title.clone(),
            query_text: self.editor.clone(),
            user_note: (!note.is_empty()).then(|| note.to_string()),
            rows_returned: run.rows_returned,
            exec_time_ms: run.exec_time_ms,
        })
    }

    /// Clears the editor and last run after a save.
    pub fn mark_saved(&mut self) {
        self.editor.clear();
        self.last_run = None;
    }
}
