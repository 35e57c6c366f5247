use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::reports::models::ReportStatus;
use crate::features::users::model::{ExpertRequestStatus, UserProfile, UserRole};

/// Request DTO for changing a user's role
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRoleDto {
    pub role: UserRole,
}

/// Filter for the admin report listing
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
pub struct ReportFilterParams {
    pub status: Option<ReportStatus>,
}

/// Response DTO for a user profile in the admin console
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileDto {
    pub id: Uuid,
    pub subject: String,
    pub email: Option<String>,
    pub role: UserRole,
    pub expert_request_status: ExpertRequestStatus,
    pub created_at: DateTime<Utc>,
}

impl From<UserProfile> for UserProfileDto {
    fn from(p: UserProfile) -> Self {
        Self {
            id: p.id,
            subject: p.subject,
            email: p.email,
            role: p.role,
            expert_request_status: p.expert_request_status,
            created_at: p.created_at,
        }
    }
}
