//! Database connection pool management and schema initialization.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Schema for the single RSVP table.
const SCHEMA: &str = include_str!("schema.sql");

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

/// Creates a SQLite connection pool, creating the database file if needed.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect_with(options)
        .await
}

/// Creates a pool backed by a private in-memory database.
///
/// The pool holds exactly one connection that is never recycled; every
/// SQLite in-memory connection is its own database.
pub async fn create_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
}

/// Ensures the rsvps table exists. Safe to call on every start.
pub async fn initialize_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(SCHEMA).execute(pool).await?;
    info!("RSVP table ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_initialize_schema_is_idempotent() {
        let pool = create_memory_pool().await.unwrap();

        assert_ok!(initialize_schema(&pool).await);
        sqlx::query("INSERT INTO rsvps (name, email, attending) VALUES ('Ada', 'ada@example.com', 'yes')")
            .execute(&pool)
            .await
            .unwrap();
        assert_ok!(initialize_schema(&pool).await);

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'rsvps'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 1);

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rsvps")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_schema_defaults() {
        let pool = create_memory_pool().await.unwrap();
        initialize_schema(&pool).await.unwrap();

        sqlx::query("INSERT INTO rsvps (name, email, attending) VALUES ('Ada', 'ada@example.com', 'no')")
            .execute(&pool)
            .await
            .unwrap();

        let (adults, children): (i64, i64) =
            sqlx::query_as("SELECT adults, children FROM rsvps LIMIT 1")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(adults, 1);
        assert_eq!(children, 0);
    }

    #[tokio::test]
    async fn test_create_pool_creates_file() {
        let path = std::env::temp_dir().join(format!(
            "wedding_rsvp_test_{}_{}.db",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let config = DatabaseConfig {
            url: format!("sqlite://{}", path.display()),
            max_connections: 2,
            connect_timeout_secs: 5,
        };

        let pool = create_pool(&config).await.unwrap();
        initialize_schema(&pool).await.unwrap();
        pool.close().await;

        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }
}
