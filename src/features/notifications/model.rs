use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Review-outcome kind, matching the `notification_kind` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Verified,
    Rejected,
}

/// Append-only notification for the original reporter. Never mutated;
/// delivery/read state is the frontend's concern.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub report_id: Uuid,
    pub created_at: DateTime<Utc>,
}
