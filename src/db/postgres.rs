//! PostgreSQL database provider
//!
//! Concrete implementation using tokio-postgres.

use crate::config::ConnectionConfig;
use crate::config::connections::SslMode;
use crate::db::DatabaseProvider;
use crate::db::catalog::{COLUMNS_QUERY, Catalog, FUNCTIONS_QUERY, TABLES_QUERY};
use crate::db::classify::{ConnectError, DriverFailure, driver_message};
use crate::db::decode::{Decoded, extract_row};
use crate::db::materialize::{FetchError, execute_failure, materialize};
use crate::db::types::QueryResult;
use crate::error::{DbError, DbResult};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_postgres::Client;
use tokio_postgres::types::ToSql;

/// Non-template databases on the server.
const DATABASES_QUERY: &str = "SELECT datname FROM pg_database WHERE datistemplate = false";

/// Tables in the public schema as listed by `pg_tables`.
const PUBLIC_TABLES_QUERY: &str =
    "SELECT tablename FROM pg_catalog.pg_tables WHERE schemaname = 'public'";

/// PostgreSQL database provider
pub struct PostgresProvider {
    /// The tokio-postgres client
    client: Client,
    /// Token for cancelling in-flight queries
    cancel_token: tokio_postgres::CancelToken,
    /// SSL mode (needed to cancel over the right transport)
    ssl_mode: SslMode,
}

/// Sends cancel requests for whatever query a provider is running.
///
/// Detached from the provider so it can be used while a query future holds
/// the provider borrowed.
#[derive(Clone)]
pub struct QueryCanceller {
    cancel_token: tokio_postgres::CancelToken,
    ssl_mode: SslMode,
}

impl PostgresProvider {
    /// Connect to a PostgreSQL database and verify the session with a ping.
    ///
    /// Returns the provider and a receiver that fires if the background
    /// connection is lost (e.g. server restart, idle timeout).
    ///
    /// # Errors
    /// Connect and ping failures are classified into
    /// `DbError::ConnectionFailed`.
    pub async fn connect(
        config: &ConnectionConfig,
    ) -> DbResult<(Self, mpsc::UnboundedReceiver<String>)> {
        let conn_string = config.connection_string_with_password();
        let target = config.target();
        let classify = |e: tokio_postgres::Error| {
            let err = ConnectError::classify(DriverFailure::from(&e), &target);
            tracing::warn!(
                category = err.category(),
                host = %target.host,
                port = target.port,
                "Connection attempt failed"
            );
            DbError::ConnectionFailed(err)
        };
        let (conn_err_tx, conn_err_rx) = mpsc::unbounded_channel();

        let client = match config.ssl_mode {
            SslMode::Disable => {
                let (client, connection) =
                    tokio_postgres::connect(&conn_string, tokio_postgres::NoTls)
                        .await
                        .map_err(&classify)?;
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        let _ = conn_err_tx
                            .send(format!("Connection lost: {}", driver_message(&e)));
                    }
                });
                client
            }
            SslMode::Prefer | SslMode::Require => {
                let tls_config = make_tls_config();
                let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);
                let (client, connection) = tokio_postgres::connect(&conn_string, tls)
                    .await
                    .map_err(&classify)?;
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        let _ = conn_err_tx
                            .send(format!("Connection lost: {}", driver_message(&e)));
                    }
                });
                client
            }
        };

        client.simple_query("SELECT 1").await.map_err(&classify)?;

        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "Connected"
        );

        let cancel_token = client.cancel_token();
        let ssl_mode = config.ssl_mode;

        Ok((
            Self {
                client,
                cancel_token,
                ssl_mode,
            },
            conn_err_rx,
        ))
    }

    /// A handle that cancels this provider's in-flight query.
    pub fn canceller(&self) -> QueryCanceller {
        QueryCanceller {
            cancel_token: self.cancel_token.clone(),
            ssl_mode: self.ssl_mode,
        }
    }

    /// Send a cancel request for the currently running query.
    pub async fn cancel_query(&self) -> DbResult<()> {
        self.canceller().cancel().await
    }

    /// Run a single-column text query and collect the column.
    async fn names(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<String>, tokio_postgres::Error> {
        let rows = self.client.query(sql, params).await?;
        rows.iter()
            .map(|row| row.try_get::<_, Decoded>(0).map(|name| name.0.render()))
            .collect()
    }
}

impl QueryCanceller {
    /// Send a cancel request for the currently running query.
    pub async fn cancel(&self) -> DbResult<()> {
        match self.ssl_mode {
            SslMode::Disable => self.cancel_token.cancel_query(tokio_postgres::NoTls).await,
            SslMode::Prefer | SslMode::Require => {
                let tls = tokio_postgres_rustls::MakeRustlsConnect::new(make_tls_config());
                self.cancel_token.cancel_query(tls).await
            }
        }
        .map_err(|e| {
            DbError::QueryFailed(format!("Cancel failed: {}", driver_message(&e)))
        })
    }
}

impl Catalog for PostgresProvider {
    async fn table_names(&self) -> DbResult<Vec<String>> {
        self.names(TABLES_QUERY, &[])
            .await
            .map_err(|e| DbError::QueryFailed(driver_message(&e)))
    }

    async fn column_names(&self, table: &str) -> DbResult<Vec<String>> {
        self.names(COLUMNS_QUERY, &[&table])
            .await
            .map_err(|e| DbError::QueryFailed(driver_message(&e)))
    }

    async fn function_names(&self) -> DbResult<Vec<String>> {
        self.names(FUNCTIONS_QUERY, &[])
            .await
            .map_err(|e| DbError::QueryFailed(driver_message(&e)))
    }
}

impl DatabaseProvider for PostgresProvider {
    async fn execute_query(&self, sql: &str) -> QueryResult {
        let stmt = match self.client.prepare(sql).await {
            Ok(stmt) => stmt,
            Err(e) => return execute_failure(driver_message(&e)),
        };

        let columns: Vec<&str> = stmt.columns().iter().map(|col| col.name()).collect();

        let rows = match self
            .client
            .query_raw(&stmt, std::iter::empty::<&str>())
            .await
        {
            Ok(rows) => rows,
            Err(e) => return execute_failure(driver_message(&e)),
        };

        let rows = rows.map(|next| match next {
            Ok(row) => extract_row(&row),
            Err(e) => Err(FetchError::Iteration(driver_message(&e))),
        });

        let result = materialize(&columns, rows).await;
        tracing::debug!(
            success = result.is_success(),
            rows = result.row_count(),
            "Query finished"
        );
        result
    }

    async fn list_databases(&self) -> DbResult<Vec<String>> {
        self.names(DATABASES_QUERY, &[])
            .await
            .map_err(|e| DbError::QueryFailed(driver_message(&e)))
    }

    async fn list_tables(&self) -> DbResult<Vec<String>> {
        self.names(PUBLIC_TABLES_QUERY, &[])
            .await
            .map_err(|e| DbError::QueryFailed(driver_message(&e)))
    }
}

/// Build a rustls ClientConfig that trusts OS certificates (with Mozilla roots as fallback)
fn make_tls_config() -> rustls::ClientConfig {
    let mut root_store = rustls::RootCertStore::empty();

    let native_certs = rustls_native_certs::load_native_certs();
    let mut loaded = 0;
    for cert in native_certs.certs {
        if root_store.add(cert).is_ok() {
            loaded += 1;
        }
    }
    if loaded == 0 {
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }

    rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth()
}
