use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use inn_core::repository::ChangeLogRepository;
use inn_core::{StoreError, StoreResult};
use inn_shared::{ChangeLog, ChangeOperation, NewChangeLog};

use crate::database::{corrupt, store_error};

pub struct StoreChangeLogRepository {
    pool: PgPool,
}

impl StoreChangeLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ChangeLogRow {
    id: Uuid,
    actor: String,
    table_name: String,
    operation: String,
    record_id: Uuid,
    before_data: Option<Value>,
    after_data: Option<Value>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ChangeLogRow> for ChangeLog {
    type Error = StoreError;

    fn try_from(row: ChangeLogRow) -> Result<Self, Self::Error> {
        let operation = ChangeOperation::parse(&row.operation)
            .ok_or_else(|| corrupt("change_logs.operation", &row.operation))?;
        Ok(ChangeLog {
            id: row.id,
            actor: row.actor,
            table_name: row.table_name,
            operation,
            record_id: row.record_id,
            before: row.before_data,
            after: row.after_data,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl ChangeLogRepository for StoreChangeLogRepository {
    async fn append(&self, entry: NewChangeLog) -> StoreResult<ChangeLog> {
        let log = entry.into_log();
        sqlx::query(
            r#"
            INSERT INTO change_logs (id, actor, table_name, operation, record_id, before_data, after_data, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(log.id)
        .bind(&log.actor)
        .bind(&log.table_name)
        .bind(log.operation.as_str())
        .bind(log.record_id)
        .bind(&log.before)
        .bind(&log.after)
        .bind(log.created_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(log)
    }

    async fn list_recent(&self, limit: usize) -> StoreResult<Vec<ChangeLog>> {
        let rows: Vec<ChangeLogRow> = sqlx::query_as(
            r#"
            SELECT id, actor, table_name, operation, record_id, before_data, after_data, created_at
            FROM change_logs
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        rows.into_iter().map(ChangeLog::try_from).collect()
    }

    async fn count(&self) -> StoreResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM change_logs")
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(total.max(0) as u64)
    }

    async fn purge(&self) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM change_logs")
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected())
    }
}
