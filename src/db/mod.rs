//! Database layer
//!
//! Connection setup and failure classification, catalog loading, query
//! execution and result rendering. The session talks to the database through
//! [`DatabaseProvider`] and [`Catalog`] so tests can run against fakes.

pub mod catalog;
pub mod classify;
pub mod decode;
pub mod materialize;
pub mod postgres;
pub mod provider;
pub mod types;

// Re-export main types
pub use catalog::{Catalog, load_schema_cache};
pub use classify::{ConnectError, ConnectTarget};
pub use provider::DatabaseProvider;
pub use types::{CellValue, QueryResult};
