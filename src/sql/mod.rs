//! SQL utilities
//!
//! Static keyword and type vocabularies, identifier quoting and the table
//! preview statement.

pub mod keywords;

pub use keywords::{DATA_TYPES, KEYWORDS};

/// Quote an identifier for interpolation into SQL text.
///
/// Wraps the name in double quotes and doubles any embedded quote. A NUL
/// byte cannot appear in a PostgreSQL identifier, so the name is cut there.
pub fn quote_identifier(name: &str) -> String {
    let name = name.split('\0').next().unwrap_or_default();
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// `SELECT * FROM <table> LIMIT 100` with the table name quoted.
pub fn preview_sql(table: &str) -> String {
    format!("SELECT * FROM {} LIMIT 100", quote_identifier(table))
}
