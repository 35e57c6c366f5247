use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::notifications::model::{Notification, NotificationKind};

const NOTIFICATION_COLUMNS: &str = "id, user_id, kind, message, report_id, created_at";

/// Append-only sink for lifecycle-transition events
pub struct NotificationService {
    pool: PgPool,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a review outcome for the reporter. Callers treat failures as
    /// non-fatal: a lost notification never rolls back the review itself.
    pub async fn append(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        message: &str,
        report_id: Uuid,
    ) -> Result<Notification> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            "INSERT INTO notifications (user_id, kind, message, report_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(user_id)
        .bind(kind)
        .bind(message)
        .bind(report_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to append notification: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(notification)
    }

    /// List a user's notifications, newest first
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Notification>, i64)> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notifications WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count notifications: {:?}", e);
                    AppError::Database(e)
                })?;

        let notifications = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications
             WHERE user_id = $1
             ORDER BY created_at DESC
             OFFSET $2 LIMIT $3"
        ))
        .bind(user_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list notifications: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((notifications, total))
    }
}
