//! Data access for the `routing` table.
//!
//! Each operation runs one statement against the injected pool, except
//! [`RoutingRepository::delete`], which removes the rule's channels and the
//! rule inside one transaction.

use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use tracing::{debug, warn};

use crate::observability::metrics;
use crate::routing::error::{RepositoryError, RepositoryResult};
use crate::routing::types::{FieldValue, RawInput, RoutingRule, RuleFields, DEFAULT_DESCRIPTION};

const SELECT_RULE: &str = "SELECT id, rexp, target, description FROM routing";

/// Repository over the `routing` table and its dependent `channels` rows.
#[derive(Debug, Clone)]
pub struct RoutingRepository {
    pool: SqlitePool,
}

impl RoutingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Fetch one rule by id.
    pub async fn get(&self, id: i64) -> RepositoryResult<Option<RoutingRule>> {
        let result = async {
            let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_RULE))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            Ok::<_, RepositoryError>(row.as_ref().map(rule_from_row).transpose()?)
        }
        .await;

        observe("get", result)
    }

    /// Fetch every rule, ordered by id.
    pub async fn get_all(&self) -> RepositoryResult<Vec<RoutingRule>> {
        let result = async {
            let rows = sqlx::query(&format!("{} ORDER BY id", SELECT_RULE))
                .fetch_all(&self.pool)
                .await?;
            Ok::<_, RepositoryError>(rows.iter().map(rule_from_row).collect::<Result<Vec<_>, _>>()?)
        }
        .await;

        observe("get_all", result)
    }

    /// Insert a rule from raw input and return its id.
    ///
    /// `rexp` and `target` are required; a missing description is stored as
    /// [`DEFAULT_DESCRIPTION`].
    pub async fn create(&self, data: &RawInput) -> RepositoryResult<i64> {
        let result = async {
            let fields = Self::check_args(data);

            let (Some(rexp), Some(target)) = (fields.rexp, fields.target) else {
                return Err(RepositoryError::Validation(
                    "rexp (1-127 chars) and target (positive integer) are required".to_string(),
                ));
            };
            let description = fields
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

            let done = sqlx::query("INSERT INTO routing (rexp, target, description) VALUES (?, ?, ?)")
                .bind(&rexp)
                .bind(target)
                .bind(&description)
                .execute(&self.pool)
                .await?;

            let id = done.last_insert_rowid();
            debug!(id, rexp = %rexp, target, "Routing rule created");
            Ok::<_, RepositoryError>(id)
        }
        .await;

        observe("create", result)
    }

    /// Delete a rule and every channel of its target group.
    ///
    /// Returns the number of channel rows removed.
    pub async fn delete(&self, id: i64) -> RepositoryResult<u64> {
        let result = async {
            let mut tx = self.pool.begin().await?;

            let target: Option<i64> = sqlx::query_scalar("SELECT target FROM routing WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

            let Some(gid) = target else {
                return Err(RepositoryError::NotFound(id));
            };

            let channels = sqlx::query("DELETE FROM channels WHERE gid = ?")
                .bind(gid)
                .execute(&mut *tx)
                .await?
                .rows_affected();

            sqlx::query("DELETE FROM routing WHERE id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;

            debug!(id, gid, channels, "Routing rule deleted");
            Ok::<_, RepositoryError>(channels)
        }
        .await;

        observe("delete", result)
    }

    /// Update the mutable fields of a rule.
    ///
    /// `rexp` and `target` are ignored even when supplied.
    pub async fn change(&self, id: i64, data: &RawInput) -> RepositoryResult<()> {
        let result = async {
            let fields = Self::check_args(data).without_immutable();
            if fields.is_empty() {
                return Err(RepositoryError::Validation(
                    "no updatable fields supplied".to_string(),
                ));
            }

            let sql = format!("UPDATE routing SET {} WHERE id = ?", Self::key_assembly(&fields));
            let mut query = sqlx::query(&sql);
            for (_, value) in fields.assignments() {
                query = match value {
                    FieldValue::Text(text) => query.bind(text),
                    FieldValue::Int(n) => query.bind(n),
                };
            }

            let updated = query.bind(id).execute(&self.pool).await?.rows_affected();
            if updated == 0 {
                return Err(RepositoryError::NotFound(id));
            }

            debug!(id, "Routing rule changed");
            Ok::<_, RepositoryError>(())
        }
        .await;

        observe("change", result)
    }

    /// Number of channels in group `gid`.
    pub async fn total(&self, gid: i64) -> RepositoryResult<i64> {
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(id) FROM channels WHERE gid = ?")
            .bind(gid)
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::from);

        observe("total", result)
    }

    /// Whether a rule with this id exists.
    pub async fn is_exist(&self, id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(id) FROM routing WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map(|count| count > 0)
            .map_err(RepositoryError::from);

        observe("is_exist", result)
    }

    /// Whitelist and filter raw input. See [`RuleFields::check_args`].
    pub fn check_args(data: &RawInput) -> RuleFields {
        RuleFields::check_args(data)
    }

    /// SET clause for the present fields. See [`RuleFields::key_assembly`].
    pub fn key_assembly(fields: &RuleFields) -> String {
        fields.key_assembly()
    }
}

fn rule_from_row(row: &SqliteRow) -> Result<RoutingRule, sqlx::Error> {
    Ok(RoutingRule {
        id: row.try_get("id")?,
        rexp: row.try_get("rexp")?,
        target: row.try_get("target")?,
        description: row.try_get("description")?,
    })
}

fn observe<T>(operation: &'static str, result: RepositoryResult<T>) -> RepositoryResult<T> {
    match &result {
        Ok(_) => metrics::record_operation(operation, "ok"),
        Err(e) => {
            metrics::record_operation(operation, e.kind());
            match e {
                RepositoryError::Storage(_) => warn!(operation, error = %e, "Routing repository failure"),
                _ => debug!(operation, error = %e, "Routing repository request rejected"),
            }
        }
    }
    result
}
