//! Database type definitions
//!
//! Core data structures for representing executed-query outcomes and
//! individual cell values.

use unicode_truncate::UnicodeTruncateStr;
use unicode_width::UnicodeWidthStr;

/// Outcome of one executed statement, fully materialized.
///
/// There is no streaming state: the whole table is rendered before the value
/// is handed back.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// Rendered box-drawing table plus the number of rows it contains
    Success { data: String, row_count: usize },
    /// Human-readable error with the driver's message embedded
    Failure { error: String },
}

impl QueryResult {
    pub fn failure(error: impl Into<String>) -> Self {
        QueryResult::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QueryResult::Success { .. })
    }

    /// Rows rendered; zero for a failure.
    pub fn row_count(&self) -> usize {
        match self {
            QueryResult::Success { row_count, .. } => *row_count,
            QueryResult::Failure { .. } => 0,
        }
    }

    /// The text to show: the table on success, the error otherwise.
    pub fn text(&self) -> &str {
        match self {
            QueryResult::Success { data, .. } => data,
            QueryResult::Failure { error } => error,
        }
    }
}

/// A cell value (single column value in a row)
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// NULL value
    Null,

    /// Integer value (all integer widths are widened to 64 bits)
    Integer(i64),

    /// Floating point value
    Float(f64),

    /// Text/string value
    Text(String),

    /// Boolean value
    Boolean(bool),

    /// JSON value (parsed)
    Json(serde_json::Value),

    /// Binary data
    Binary(Vec<u8>),

    /// Date/time value (stored as string for now)
    DateTime(String),

    /// UUID value
    Uuid(String),

    /// Array value
    Array(Vec<CellValue>),
}

impl CellValue {
    /// Full, untruncated text for this value.
    pub fn render(&self) -> String {
        match self {
            CellValue::Null => "NULL".to_string(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(f) => format!("{:.2}", f),
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(b) => b.to_string(),
            CellValue::Json(v) => v.to_string(),
            CellValue::Binary(b) => String::from_utf8_lossy(b).into_owned(),
            CellValue::DateTime(s) => s.clone(),
            CellValue::Uuid(s) => s.clone(),
            CellValue::Array(arr) => {
                let items: Vec<String> = arr.iter().map(CellValue::render).collect();
                format!("{{{}}}", items.join(","))
            }
        }
    }

    /// Get a display string for this cell value (truncated if needed)
    ///
    /// Text wider than `max_len` columns keeps its first `max_len - 3`
    /// columns followed by `...`.
    pub fn display_string(&self, max_len: usize) -> String {
        truncate_display(&self.render(), max_len)
    }
}

/// Cut `text` to at most `max_len` display columns, marking the cut with `...`.
pub fn truncate_display(text: &str, max_len: usize) -> String {
    if text.width() <= max_len {
        return text.to_string();
    }
    let (kept, _) = text.unicode_truncate(max_len.saturating_sub(3));
    format!("{}...", kept)
}
