//! Result materializer
//!
//! Renders a query's rows into a fixed-width box-drawing table. Every column
//! gets a 15-column content field, at most 100 rows are read, and the
//! outcome is always a [`QueryResult`] value, never an error.
//!
//! The driver side hands over a stream of already-decoded rows; a decode
//! failure arrives as [`FetchError::Scan`], a transport or server error while
//! reading as [`FetchError::Iteration`].

use crate::db::types::{CellValue, QueryResult};
use futures::{Stream, StreamExt};
use unicode_truncate::{Alignment, UnicodeTruncateStr};

/// Content width of every column, in display columns.
pub const CELL_WIDTH: usize = 15;

/// Rows rendered before reading stops.
pub const MAX_ROWS: usize = 100;

/// Why a row could not be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// A value in the row could not be decoded
    Scan(String),
    /// The cursor failed while fetching
    Iteration(String),
}

/// Message for a statement that failed to execute.
pub fn execute_failure(driver_message: impl std::fmt::Display) -> QueryResult {
    QueryResult::failure(format!("Error executing query:\n{}", driver_message))
}

/// Incrementally built result table.
#[derive(Debug)]
pub struct ResultTable {
    out: String,
    row_count: usize,
}

impl ResultTable {
    /// Start a table: banner, header row and separator row.
    pub fn new<S: AsRef<str>>(columns: &[S]) -> Self {
        let mut out = String::from("Query executed successfully!\n\n");

        out.push('│');
        for col in columns {
            push_cell(&mut out, col.as_ref());
        }
        out.push('\n');

        out.push('├');
        let segment = "─".repeat(CELL_WIDTH + 2);
        let separator = vec![segment; columns.len()].join("┼");
        out.push_str(&separator);
        out.push_str("┤\n");

        Self { out, row_count: 0 }
    }

    /// Append one row. Each cell is truncated to the column width.
    pub fn push_row(&mut self, cells: &[CellValue]) {
        self.out.push('│');
        for cell in cells {
            push_cell(&mut self.out, &cell.display_string(CELL_WIDTH));
        }
        self.out.push('\n');
        self.row_count += 1;
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_full(&self) -> bool {
        self.row_count >= MAX_ROWS
    }

    /// Close the table. `truncated` adds the row-cap note.
    pub fn finish(mut self, truncated: bool) -> QueryResult {
        if truncated {
            self.out
                .push_str(&format!("\n... (showing first {} rows only)\n", MAX_ROWS));
        }
        self.out
            .push_str(&format!("\nTotal rows: {}", self.row_count));
        QueryResult::Success {
            data: self.out,
            row_count: self.row_count,
        }
    }
}

/// ` <text padded to CELL_WIDTH> │`. Header names are padded but never cut.
fn push_cell(out: &mut String, text: &str) {
    out.push(' ');
    out.push_str(&text.unicode_pad(CELL_WIDTH, Alignment::Left, false));
    out.push_str(" │");
}

/// Drain `rows` into a rendered table.
///
/// Stops after [`MAX_ROWS`] rows; the truncation note is added only when the
/// stream still had another row to give. Any fetch error before the cap
/// discards the partial table and yields a failure.
pub async fn materialize<S, R>(columns: &[S], rows: R) -> QueryResult
where
    S: AsRef<str>,
    R: Stream<Item = Result<Vec<CellValue>, FetchError>>,
{
    let mut rows = std::pin::pin!(rows);
    let mut table = ResultTable::new(columns);

    while let Some(next) = rows.next().await {
        match next {
            Ok(cells) => table.push_row(&cells),
            Err(FetchError::Scan(msg)) => {
                return QueryResult::failure(format!("Error scanning row:\n{}", msg));
            }
            Err(FetchError::Iteration(msg)) => {
                return QueryResult::failure(format!("Error iterating rows:\n{}", msg));
            }
        }

        if table.is_full() {
            let truncated = matches!(rows.next().await, Some(Ok(_)));
            return table.finish(truncated);
        }
    }

    table.finish(false)
}
