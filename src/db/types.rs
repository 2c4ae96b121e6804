//! Result types for the execution engine.
//!
//! Defines the structures used to represent statement outcomes, both the
//! raw driver shape and the normalized shape handed back to callers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single field value from a result row.
///
/// Results travel in text form (the simple-query wire format), so a field
/// is either SQL NULL or its textual rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// Textual rendering of a non-null value.
    Text(String),
}

impl Value {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the contained text, or `None` for NULL.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Null => None,
            Value::Text(s) => Some(s),
        }
    }

    /// Returns a string representation suitable for display.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Option<String>> for Value {
    fn from(v: Option<String>) -> Self {
        match v {
            Some(s) => Value::Text(s),
            None => Value::Null,
        }
    }
}

/// A row of data from a result set.
pub type Row = Vec<Value>;

/// Raw outcome of executing one statement through a driver connection.
///
/// `description` is present exactly when the statement produced a result
/// set (a `SELECT` with zero rows still carries its description; DDL and
/// DML without `RETURNING` do not).
#[derive(Debug, Clone, Default)]
pub struct Executed {
    /// Ordered column names, when the statement returned a result set.
    pub description: Option<Vec<String>>,

    /// Fetched rows. Empty unless `description` is present.
    pub rows: Vec<Row>,

    /// Driver status message, e.g. `SELECT 3` or `CREATE TABLE`.
    pub status: String,
}

/// The normalized outcome of one server round trip.
///
/// Rows and headers are present or absent together; the status message
/// may be present independently of both. A single submitted statement may
/// yield one or more entries (composite meta-commands).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultEntry {
    /// Ordered rows, matching `headers` in arity.
    pub rows: Option<Vec<Row>>,

    /// Ordered column names.
    pub headers: Option<Vec<String>>,

    /// Driver or engine status message.
    pub status: Option<String>,
}

impl ResultEntry {
    /// An entry with all three fields absent (empty input).
    pub fn empty() -> Self {
        Self::default()
    }

    /// An entry carrying only a status message.
    pub fn status_only(status: impl Into<String>) -> Self {
        Self {
            rows: None,
            headers: None,
            status: Some(status.into()),
        }
    }

    /// An entry carrying a full result set.
    pub fn with_rows(rows: Vec<Row>, headers: Vec<String>, status: impl Into<String>) -> Self {
        Self {
            rows: Some(rows),
            headers: Some(headers),
            status: Some(status.into()),
        }
    }

    /// Returns true if this entry carries a result set.
    pub fn has_rows(&self) -> bool {
        self.rows.is_some()
    }
}

impl From<Executed> for ResultEntry {
    fn from(executed: Executed) -> Self {
        match executed.description {
            Some(headers) => Self::with_rows(executed.rows, headers, executed.status),
            None => Self::status_only(executed.status),
        }
    }
}
