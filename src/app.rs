//! Session state and line handling
//!
//! One line in, one action out. Lines starting with `/` (or `:`) are
//! commands, except for a leading `/*` comment; everything else is SQL
//! handed to the database. The schema cache
//! is built before the session starts and never changes afterwards.

use crate::commands::{Command, help_text, parse_command};
use crate::completer::SchemaCache;
use crate::db::DatabaseProvider;
use crate::error::Result;
use std::future::Future;
use tokio::io::{AsyncBufRead, Lines};

/// What the caller should do after a line was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing to show
    None,
    /// Show this text
    Print(String),
    /// End the session
    Quit,
}

/// Main session state
pub struct App<D> {
    /// Name of current connection profile
    pub connection_name: Option<String>,

    /// Whether the session is still accepting input
    pub running: bool,

    db: D,
    schema: SchemaCache,
}

impl<D: DatabaseProvider> App<D> {
    pub fn new(db: D, schema: SchemaCache) -> Self {
        Self {
            connection_name: None,
            running: true,
            db,
            schema,
        }
    }

    /// Create a session for a named connection profile
    pub fn with_connection(name: String, db: D, schema: SchemaCache) -> Self {
        let mut app = Self::new(db, schema);
        app.connection_name = Some(name);
        app
    }

    pub fn schema(&self) -> &SchemaCache {
        &self.schema
    }

    /// Prompt shown before each line
    pub fn prompt(&self) -> String {
        match &self.connection_name {
            Some(name) => format!("{}> ", name),
            None => "maxim> ".to_string(),
        }
    }

    /// Handle one input line.
    ///
    /// # Errors
    /// Returns `MaximError::Command` for an unparseable command and
    /// `MaximError::Database` when a listing query fails. Failed SQL is not
    /// an error; its message comes back as [`Action::Print`].
    pub async fn handle_line(&mut self, line: &str) -> Result<Action> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Action::None);
        }

        if is_command(trimmed) {
            let command = parse_command(line)?;
            return self.execute_command(command).await;
        }

        let result = self.db.execute_query(trimmed).await;
        tracing::debug!(success = result.is_success(), "Statement handled");
        Ok(Action::Print(result.text().to_string()))
    }

    async fn execute_command(&mut self, command: Command) -> Result<Action> {
        match command {
            Command::Tables => {
                let tables = self.db.list_tables().await?;
                Ok(Action::Print(format_list("tables", &tables)))
            }
            Command::Databases => {
                let databases = self.db.list_databases().await?;
                Ok(Action::Print(format_list("databases", &databases)))
            }
            Command::Preview(table) => {
                let result = self.db.preview_table(&table).await;
                Ok(Action::Print(result.text().to_string()))
            }
            Command::Complete(text) => {
                let suggestions = self.schema.suggestions(&text, text.len());
                if suggestions.is_empty() {
                    Ok(Action::Print("No suggestions".to_string()))
                } else {
                    Ok(Action::Print(suggestions.join("\n")))
                }
            }
            Command::Help => Ok(Action::Print(help_text().to_string())),
            Command::Quit => {
                self.running = false;
                Ok(Action::Quit)
            }
        }
    }
}

/// Wait for the next input line at an idle prompt.
///
/// `None` means the session should end: input closed or `interrupt`
/// resolved first (Ctrl+C while no query is running).
pub async fn next_line<R, F>(
    lines: &mut Lines<R>,
    interrupt: F,
) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    F: Future,
{
    tokio::select! {
        line = lines.next_line() => line,
        _ = interrupt => Ok(None),
    }
}

/// `/name` or `:name`. A leading `/*` opens an SQL comment instead.
fn is_command(line: &str) -> bool {
    (line.starts_with('/') && !line.starts_with("/*")) || line.starts_with(':')
}

/// One name per line under a count header, or a "none" line.
fn format_list(kind: &str, names: &[String]) -> String {
    if names.is_empty() {
        return format!("No {} found", kind);
    }
    let mut out = format!("{} {}:", names.len(), kind);
    for name in names {
        out.push_str("\n  ");
        out.push_str(name);
    }
    out
}
