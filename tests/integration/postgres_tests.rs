//! Integration tests for PostgresProvider
//!
//! These tests require a running PostgreSQL; see `tests/integration.rs`.

use crate::common::{connect_or_skip, test_config};
use maxim::db::postgres::PostgresProvider;
use maxim::db::{ConnectError, DatabaseProvider, load_schema_cache};
use maxim::error::DbError;
use std::time::Duration;

#[tokio::test]
async fn test_connect_to_database() {
    let Some(provider) = connect_or_skip().await else {
        return;
    };
    let result = provider.execute_query("SELECT 1").await;
    assert!(result.is_success());
}

#[tokio::test]
async fn test_unreachable_server_is_generic_failure() {
    let mut config = test_config();
    config.host = "127.0.0.1".to_string();
    config.port = 1;

    let Err(err) = PostgresProvider::connect(&config).await else {
        panic!("nothing should be listening on port 1");
    };
    let DbError::ConnectionFailed(err) = err else {
        panic!("expected a connection failure");
    };
    assert_eq!(err.category(), "generic");
    assert_eq!(err.sqlstate(), None);
    assert!(
        err.to_string().starts_with("error connecting to server: "),
        "{}",
        err
    );
}

#[tokio::test]
async fn test_wrong_password_is_classified() {
    if connect_or_skip().await.is_none() {
        return;
    }
    let mut config = test_config();
    config.password = Some("definitely-not-the-password".to_string());

    match PostgresProvider::connect(&config).await {
        Ok(_) => eprintln!("Skipping test: server does not check passwords"),
        Err(DbError::ConnectionFailed(ConnectError::InvalidPassword { user })) => {
            assert_eq!(user, config.username);
        }
        Err(other) => panic!("Expected invalid password, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_database_is_classified() {
    if connect_or_skip().await.is_none() {
        return;
    }
    let mut config = test_config();
    config.database = "maxim_no_such_database".to_string();

    let Err(DbError::ConnectionFailed(err)) = PostgresProvider::connect(&config).await else {
        panic!("connecting to a missing database should fail");
    };
    assert_eq!(err.category(), "database-missing");
    assert_eq!(
        err.to_string(),
        "database \"maxim_no_such_database\" does not exist"
    );
}

#[tokio::test]
async fn test_execute_simple_query() {
    let Some(provider) = connect_or_skip().await else {
        return;
    };

    let result = provider
        .execute_query("SELECT 1 AS num, 'hello' AS msg")
        .await;
    assert!(result.is_success(), "{}", result.text());
    assert_eq!(result.row_count(), 1);

    let text = result.text();
    assert!(text.starts_with("Query executed successfully!\n\n"));
    assert!(text.contains(&format!("│ {:<15} │ {:<15} │", "num", "msg")));
    assert!(text.contains(&format!("│ {:<15} │ {:<15} │", "1", "hello")));
    assert!(text.ends_with("\nTotal rows: 1"));
}

#[tokio::test]
async fn test_value_rendering() {
    let Some(provider) = connect_or_skip().await else {
        return;
    };

    let result = provider
        .execute_query(
            "SELECT NULL::int AS n, 2.5::float8 AS f, true AS b, \
             'a very long string value exceeding fifteen characters'::text AS s",
        )
        .await;
    assert!(result.is_success(), "{}", result.text());
    assert!(result.text().contains(&format!(
        "│ {:<15} │ {:<15} │ {:<15} │ {:<15} │",
        "NULL", "2.50", "true", "a very long ..."
    )));
}

#[tokio::test]
async fn test_types_without_typed_mapping_render_values() {
    let Some(provider) = connect_or_skip().await else {
        return;
    };

    let result = provider
        .execute_query(
            "SELECT interval '1 day 02:00:00' AS i, NULL::interval AS j, \
             '192.168.0.1/24'::inet AS addr, '12.50'::money AS m, B'1011' AS bits, \
             ARRAY[DATE '2024-01-02'] AS days",
        )
        .await;
    assert!(result.is_success(), "{}", result.text());
    let text = result.text();
    assert!(text.contains("│ 1 day 02:00:00  │"), "{}", text);
    assert!(text.contains("│ NULL            │"), "{}", text);
    assert!(text.contains("192.168.0.1"), "{}", text);
    assert!(text.contains("$12.50"), "{}", text);
    assert!(text.contains("│ 1011            │"), "{}", text);
    assert!(text.contains("{2024-01-02}"), "{}", text);
}

#[tokio::test]
async fn test_row_cap() {
    let Some(provider) = connect_or_skip().await else {
        return;
    };

    let capped = provider
        .execute_query("SELECT n FROM generate_series(1, 150) AS n")
        .await;
    assert_eq!(capped.row_count(), 100);
    assert!(
        capped
            .text()
            .ends_with("\n... (showing first 100 rows only)\n\nTotal rows: 100")
    );

    let exact = provider
        .execute_query("SELECT n FROM generate_series(1, 100) AS n")
        .await;
    assert_eq!(exact.row_count(), 100);
    assert!(!exact.text().contains("showing first"));
}

#[tokio::test]
async fn test_syntax_error_is_failure_value() {
    let Some(provider) = connect_or_skip().await else {
        return;
    };

    let result = provider.execute_query("SELEC 1").await;
    assert!(!result.is_success());
    assert!(result.text().starts_with("Error executing query:\nERROR: "));
    assert!(result.text().contains("syntax error"), "{}", result.text());
}

#[tokio::test]
async fn test_error_while_reading_rows_is_failure_value() {
    let Some(provider) = connect_or_skip().await else {
        return;
    };

    let result = provider
        .execute_query("SELECT 1 / (n - 3) FROM generate_series(1, 5) AS n")
        .await;
    assert!(!result.is_success());
    assert_eq!(result.row_count(), 0);
    assert!(result.text().contains("division by zero"), "{}", result.text());
}

#[tokio::test]
async fn test_schema_cache_and_listings() {
    let Some(provider) = connect_or_skip().await else {
        return;
    };

    let setup = provider
        .execute_query(
            "CREATE TABLE IF NOT EXISTS maxim_it_widgets (id integer, label text, weight float8)",
        )
        .await;
    assert!(setup.is_success(), "{}", setup.text());
    provider
        .execute_query("INSERT INTO maxim_it_widgets VALUES (1, 'bolt', 0.25), (2, 'nut', 0.1)")
        .await;

    let cache = load_schema_cache(&provider).await.unwrap();
    assert!(cache.is_initialized());
    assert!(cache.tables().iter().any(|t| t == "maxim_it_widgets"));
    assert_eq!(cache.columns("maxim_it_widgets"), ["id", "label", "weight"]);

    let suggestions = cache.suggestions("SELECT * FROM maxim_it_widgets WHERE lab", 40);
    assert!(suggestions.iter().any(|s| s == "label"));

    let tables = provider.list_tables().await.unwrap();
    assert!(tables.iter().any(|t| t == "maxim_it_widgets"));

    let databases = provider.list_databases().await.unwrap();
    assert!(databases.contains(&test_config().database));

    let preview = provider.preview_table("maxim_it_widgets").await;
    assert!(preview.is_success(), "{}", preview.text());
    assert!(preview.row_count() >= 2);

    provider
        .execute_query("DROP TABLE IF EXISTS maxim_it_widgets")
        .await;
}

#[tokio::test]
async fn test_preview_missing_table_is_failure_value() {
    let Some(provider) = connect_or_skip().await else {
        return;
    };

    let result = provider.preview_table("maxim_it_missing\"; DROP").await;
    assert!(!result.is_success());
    assert!(result.text().starts_with("Error executing query:\n"));
    assert!(result.text().contains("does not exist"), "{}", result.text());
}

#[tokio::test]
async fn test_cancel_running_query() {
    let Some(provider) = connect_or_skip().await else {
        return;
    };
    let canceller = provider.canceller();

    let (result, cancelled) = tokio::join!(provider.execute_query("SELECT pg_sleep(10)"), async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        canceller.cancel().await
    });

    assert!(cancelled.is_ok());
    assert!(!result.is_success());
    assert!(result.text().contains("canceling statement"), "{}", result.text());
}
