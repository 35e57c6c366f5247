use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::audit::model::ActivityLogEntry;

const LOG_COLUMNS: &str = "id, admin_id, action, entity_type, entity_id, detail, created_at";

/// Service for the append-only activity log
pub struct ActivityLogService {
    pool: PgPool,
}

impl ActivityLogService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append an entry inside the caller's transaction so the audit trail
    /// commits or rolls back together with the mutation it records.
    pub async fn append_tx(
        tx: &mut Transaction<'_, Postgres>,
        admin_id: Uuid,
        action: &str,
        entity_type: &str,
        entity_id: &str,
        detail: serde_json::Value,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO activity_logs (admin_id, action, entity_type, entity_id, detail)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(admin_id)
        .bind(action)
        .bind(entity_type)
        .bind(entity_id)
        .bind(detail)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to append activity log entry: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(())
    }

    /// List the audit trail, newest first
    pub async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<ActivityLogEntry>, i64)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM activity_logs")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count activity log entries: {:?}", e);
                AppError::Database(e)
            })?;

        let entries = sqlx::query_as::<_, ActivityLogEntry>(&format!(
            "SELECT {LOG_COLUMNS} FROM activity_logs
             ORDER BY created_at DESC
             OFFSET $1 LIMIT $2"
        ))
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list activity log entries: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((entries, total))
    }
}
