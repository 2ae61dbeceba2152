//! Schema-aware completion
//!
//! [`SchemaCache`] is an immutable snapshot of the connected database's
//! tables, per-table columns and functions, built once per session by
//! [`load_schema_cache`](crate::db::catalog::load_schema_cache). Every
//! keystroke calls [`SchemaCache::suggestions`], which never touches the
//! connection.
//!
//! Suggestion order is: tables after a table keyword, tables again when a
//! `FROM`/`JOIN` appears anywhere before the cursor, columns of the last
//! table named after `FROM`/`JOIN`, keywords, functions (with `()`).
//! Nothing is deduplicated and the list is cut at [`MAX_SUGGESTIONS`].
//! Table aliases (`FROM users u`) are not resolved.

use crate::sql::{DATA_TYPES, KEYWORDS};
use std::collections::HashMap;

/// Upper bound on the length of a suggestion list.
pub const MAX_SUGGESTIONS: usize = 20;

/// Keywords after which the next token is a table name.
const TABLE_KEYWORDS: [&str; 4] = ["from", "join", "update", "into"];

/// Cached schema names for one connection.
#[derive(Debug, Clone, Default)]
pub struct SchemaCache {
    tables: Vec<String>,
    columns: HashMap<String, Vec<String>>,
    functions: Vec<String>,
    initialized: bool,
}

impl SchemaCache {
    /// An initialized cache from already-loaded names.
    ///
    /// Column entries for tables not in `tables` are dropped.
    pub fn new(
        tables: Vec<String>,
        mut columns: HashMap<String, Vec<String>>,
        functions: Vec<String>,
    ) -> Self {
        columns.retain(|table, _| tables.contains(table));
        Self {
            tables,
            columns,
            functions,
            initialized: true,
        }
    }

    /// Table names in load order (alphabetical).
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    /// Columns of `table` in ordinal order. Empty when unknown.
    pub fn columns(&self, table: &str) -> &[String] {
        self.columns.get(table).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn functions(&self) -> &[String] {
        &self.functions
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        KEYWORDS
    }

    pub fn data_types(&self) -> &'static [&'static str] {
        DATA_TYPES
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Completion candidates for `query` with the cursor at byte offset
    /// `cursor`. Empty until the cache is initialized.
    pub fn suggestions(&self, query: &str, cursor: usize) -> Vec<String> {
        if !self.initialized {
            return Vec::new();
        }

        let before = text_before_cursor(query, cursor);
        let before_lower = before.to_lowercase();
        let word_lower = current_word(query, cursor).to_lowercase();
        let matches = |name: &str| name.to_lowercase().starts_with(&word_lower);

        let mut suggestions = Vec::new();

        if follows_table_keyword(&before_lower) {
            suggestions.extend(self.tables.iter().filter(|t| matches(t.as_str())).cloned());
        }

        if before_lower.contains(" from ") || before_lower.contains(" join ") {
            suggestions.extend(self.tables.iter().filter(|t| matches(t.as_str())).cloned());
        }

        if let Some(table) = self.table_in_scope(before) {
            suggestions.extend(
                self.columns(table)
                    .iter()
                    .filter(|c| matches(c.as_str()))
                    .cloned(),
            );
        }

        suggestions.extend(
            KEYWORDS
                .iter()
                .filter(|kw| matches(**kw))
                .map(|kw| kw.to_string()),
        );

        suggestions.extend(
            self.functions
                .iter()
                .filter(|f| matches(f.as_str()))
                .map(|f| format!("{}()", f)),
        );

        suggestions.truncate(MAX_SUGGESTIONS);
        suggestions
    }

    /// The cached name of the table named by the last `FROM <table>` or
    /// `JOIN <table>` pair in `before`. Tokens must equal a table name
    /// (case-insensitively); aliases and qualified names do not count.
    fn table_in_scope(&self, before: &str) -> Option<&str> {
        let tokens: Vec<&str> = before.split_whitespace().collect();
        let mut found = None;

        for pair in tokens.windows(2) {
            let keyword = pair[0].to_lowercase();
            if keyword != "from" && keyword != "join" {
                continue;
            }
            let candidate = pair[1].to_lowercase();
            if let Some(table) = self.tables.iter().find(|t| t.to_lowercase() == candidate) {
                found = Some(table.as_str());
            }
        }

        found
    }
}

/// True at the start of input, or when the last token before the cursor is
/// one of `from`, `join`, `update`, `into`. Expects lowercased text.
fn follows_table_keyword(before_lower: &str) -> bool {
    match before_lower.split_whitespace().last() {
        None => true,
        Some(last) => TABLE_KEYWORDS.contains(&last),
    }
}

/// Text before `cursor`, clamped to the input and to a char boundary.
fn text_before_cursor(query: &str, cursor: usize) -> &str {
    let mut end = cursor.min(query.len());
    while !query.is_char_boundary(end) {
        end -= 1;
    }
    &query[..end]
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// The alphanumeric/underscore run around byte offset `cursor`.
///
/// Scans backward from the character before the cursor and forward from the
/// cursor. Returns `""` when `cursor` is 0, past the end of `query`, or not
/// on a char boundary.
pub fn current_word(query: &str, cursor: usize) -> &str {
    if cursor == 0 || cursor > query.len() || !query.is_char_boundary(cursor) {
        return "";
    }
    let bytes = query.as_bytes();

    let mut start = cursor;
    while start > 0 && is_word_byte(bytes[start - 1]) {
        start -= 1;
    }

    let mut end = cursor;
    while end < bytes.len() && is_word_byte(bytes[end]) {
        end += 1;
    }

    &query[start..end]
}
