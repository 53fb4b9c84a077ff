//! SQLite connection pool and schema bootstrap.
//!
//! The pool is built once at startup and handed to repositories; nothing in
//! the crate looks a connection up globally.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use crate::config::DatabaseConfig;

/// Open a pool for the configured database.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(config.create_if_missing);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    if config.init_schema {
        init_schema(&pool).await?;
    }

    info!(
        url = %config.url,
        max_connections = config.max_connections,
        "Database pool opened"
    );
    Ok(pool)
}

/// Create an in-memory database with the schema in place.
///
/// Every connection to `:memory:` is its own database, so the pool is pinned
/// to a single connection that is never recycled.
pub async fn in_memory() -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
        .await?;

    init_schema(&pool).await?;
    Ok(pool)
}

/// Create the `routing` and `channels` tables if they do not exist.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS routing (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            rexp TEXT NOT NULL,
            target INTEGER NOT NULL,
            description TEXT NOT NULL DEFAULT 'no description'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS channels (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            gid INTEGER NOT NULL,
            weight INTEGER NOT NULL DEFAULT 1,
            operator INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_channels_gid ON channels(gid)")
        .execute(pool)
        .await?;

    debug!("Routing schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let pool = in_memory().await.unwrap();
        init_schema(&pool).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('routing', 'channels') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(tables, vec!["channels".to_string(), "routing".to_string()]);
    }

    #[tokio::test]
    async fn test_connect_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routing.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}", path.display()),
            max_connections: 2,
            create_if_missing: true,
            init_schema: true,
        };

        let pool = connect(&config).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM routing")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_connect_without_create_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("absent.db").display()),
            max_connections: 1,
            create_if_missing: false,
            init_schema: false,
        };

        assert!(connect(&config).await.is_err());
    }
}
