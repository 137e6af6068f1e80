//! Read-only query validation.
//!
//! Practice queries may only read the reference data. [`validate_select`] is
//! the gate every query passes before it reaches the store: the trimmed text
//! must start with `SELECT` (any case) and must hold a single statement.
//!
//! # Examples
//!
//! ```
//! use sql_practice_core::{RejectedQuery, validate_select};
//!
//! assert!(validate_select("  select * from orders;").is_ok());
//! assert_eq!(validate_select("DROP TABLE orders"), Err(RejectedQuery::NotSelect));
//! assert_eq!(
//!     validate_select("SELECT 1; DELETE FROM orders"),
//!     Err(RejectedQuery::MultipleStatements)
//! );
//! ```

use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;

/// Reasons a query is refused before execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectedQuery {
    /// Input is empty or whitespace-only.
    #[error("query is empty")]
    Empty,
    /// Input does not start with `SELECT`.
    #[error("only SELECT queries are allowed")]
    NotSelect,
    /// Input holds more than one statement.
    #[error("only a single SELECT statement is allowed")]
    MultipleStatements,
    /// The engine reports that the prepared statement writes.
    #[error("statement would modify the database")]
    NotReadOnly,
}

/// Checks that `query` is a single `SELECT` statement.
///
/// A trailing `;` is allowed. Semicolons inside string literals, quoted
/// identifiers and comments are ignored.
pub fn validate_select(query: &str) -> Result<(), RejectedQuery> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(RejectedQuery::Empty);
    }
    if !trimmed
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("select"))
    {
        return Err(RejectedQuery::NotSelect);
    }
    if has_trailing_statement(trimmed) {
        return Err(RejectedQuery::MultipleStatements);
    }
    Ok(())
}

/// Returns `true` if anything other than whitespace or comments follows a
/// statement terminator.
fn has_trailing_statement(sql: &str) -> bool {
    let mut chars = sql.chars().peekable();
    let mut terminated = false;

    while let Some(c) = chars.next() {
        match c {
            ';' => terminated = true,
            '-' if chars.peek() == Some(&'-') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                skip_block_comment(&mut chars);
            }
            c if c.is_whitespace() => {}
            _ if terminated => return true,
            '\'' | '"' | '`' => skip_until(&mut chars, c),
            '[' => skip_until(&mut chars, ']'),
            _ => {}
        }
    }

    false
}

// Doubled quotes (`'it''s'`) close and immediately reopen, which scans the same.
fn skip_until(chars: &mut Peekable<Chars<'_>>, close: char) {
    for c in chars.by_ref() {
        if c == close {
            break;
        }
    }
}

fn skip_block_comment(chars: &mut Peekable<Chars<'_>>) {
    while let Some(c) = chars.next() {
        if c == '*' && chars.peek() == Some(&'/') {
            chars.next();
            break;
        }
    }
}
