//! Database provider trait
//!
//! Defines the operations the session runs against a connected database.
//! The live implementation is [`PostgresProvider`](crate::db::postgres::PostgresProvider);
//! tests substitute in-memory fakes.

use crate::db::types::QueryResult;
use crate::error::DbResult;
use crate::sql::preview_sql;

/// Main database provider trait
#[allow(async_fn_in_trait)]
pub trait DatabaseProvider {
    /// Execute a SQL statement and render its rows.
    ///
    /// Never errors: a failed statement comes back as
    /// [`QueryResult::Failure`] carrying the driver's message.
    async fn execute_query(&self, sql: &str) -> QueryResult;

    /// Names of the non-template databases on the server
    ///
    /// # Errors
    /// Returns `DbError::QueryFailed` if the listing query fails
    async fn list_databases(&self) -> DbResult<Vec<String>>;

    /// Names of the tables in the public schema
    ///
    /// # Errors
    /// Returns `DbError::QueryFailed` if the listing query fails
    async fn list_tables(&self) -> DbResult<Vec<String>>;

    /// First rows of a table, rendered like any other query.
    ///
    /// The name is quoted as an identifier before it reaches SQL text.
    async fn preview_table(&self, table: &str) -> QueryResult {
        self.execute_query(&preview_sql(table)).await
    }
}
