use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Append-only audit record of a privileged mutation.
/// Written in the same transaction as the mutation it describes.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct ActivityLogEntry {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    #[schema(value_type = Object)]
    pub detail: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Action codes recorded in the activity log
pub mod actions {
    pub const REPORT_SOFT_DELETE: &str = "report.soft_delete";
    pub const USER_ROLE_CHANGE: &str = "user.role_change";
    pub const EXPERT_REQUEST_APPROVE: &str = "user.expert_request_approve";
    pub const EXPERT_REQUEST_REJECT: &str = "user.expert_request_reject";
}
