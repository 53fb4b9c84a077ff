//! Shared utilities for repository integration tests.

use serde_json::Value;
use sqlx::sqlite::SqlitePool;

use routing_admin::routing::{RawInput, RoutingRepository};
use routing_admin::storage;

/// A repository over a fresh in-memory database.
pub async fn setup() -> RoutingRepository {
    let pool = storage::in_memory().await.unwrap();
    RoutingRepository::new(pool)
}

/// Turn a JSON object literal into raw request input.
pub fn input(value: Value) -> RawInput {
    value.as_object().cloned().expect("input must be a JSON object")
}

/// Insert a channel into group `gid`.
pub async fn insert_channel(pool: &SqlitePool, gid: i64) -> i64 {
    sqlx::query("INSERT INTO channels (gid, weight, operator) VALUES (?, 1, 0)")
        .bind(gid)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

/// Count every row in `table`.
#[allow(dead_code)]
pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}
