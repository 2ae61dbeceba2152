//! Metadata loader
//!
//! Builds a [`SchemaCache`] from the catalog of a live connection: tables,
//! then each table's columns, then functions. Table and function failures
//! abort the load; a failing column query only leaves that table without
//! columns.

use crate::completer::SchemaCache;
use crate::error::{DbError, DbResult};
use std::collections::HashMap;

/// Tables in the public schema, alphabetical.
pub const TABLES_QUERY: &str = "SELECT table_name \
     FROM information_schema.tables \
     WHERE table_schema = 'public' \
     ORDER BY table_name";

/// Columns of one public table (`$1`), in ordinal order.
pub const COLUMNS_QUERY: &str = "SELECT column_name \
     FROM information_schema.columns \
     WHERE table_schema = 'public' \
     AND table_name = $1 \
     ORDER BY ordinal_position";

/// Functions in the public schema, alphabetical.
pub const FUNCTIONS_QUERY: &str = "SELECT routine_name \
     FROM information_schema.routines \
     WHERE routine_schema = 'public' \
     AND routine_type = 'FUNCTION' \
     ORDER BY routine_name";

/// Name inventories the loader reads. Implemented by the live connection.
#[allow(async_fn_in_trait)]
pub trait Catalog {
    async fn table_names(&self) -> DbResult<Vec<String>>;

    async fn column_names(&self, table: &str) -> DbResult<Vec<String>>;

    async fn function_names(&self) -> DbResult<Vec<String>>;
}

/// Load a fresh, initialized schema cache.
///
/// # Errors
/// Returns `DbError::SchemaLoadFailed` naming the failed step when the table
/// or function query fails.
pub async fn load_schema_cache<C: Catalog>(catalog: &C) -> DbResult<SchemaCache> {
    let tables = catalog
        .table_names()
        .await
        .map_err(|e| DbError::SchemaLoadFailed(format!("failed to load tables: {}", e)))?;

    let mut columns = HashMap::with_capacity(tables.len());
    for table in &tables {
        match catalog.column_names(table).await {
            Ok(names) => {
                columns.insert(table.clone(), names);
            }
            Err(e) => {
                tracing::debug!(table = %table, error = %e, "Skipping columns for table");
            }
        }
    }

    let functions = catalog
        .function_names()
        .await
        .map_err(|e| DbError::SchemaLoadFailed(format!("failed to load functions: {}", e)))?;

    tracing::info!(
        tables = tables.len(),
        tables_with_columns = columns.len(),
        functions = functions.len(),
        "Schema cache loaded"
    );

    Ok(SchemaCache::new(tables, columns, functions))
}
