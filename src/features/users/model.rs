use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::{AppError, Result};

/// Role stored on the user profile, matching the `user_role` database enum.
///
/// Role hierarchy (from highest to lowest):
/// - admin: full access, including soft deletes and role management
/// - expert: can review (approve/reject) reports; own submissions are
///   auto-approved
/// - user: can submit reports and track their own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    User,
    Expert,
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::User => write!(f, "user"),
            UserRole::Expert => write!(f, "expert"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

/// Expert-request workflow state, matching the `expert_request_status` enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "expert_request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ExpertRequestStatus {
    None,
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for ExpertRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpertRequestStatus::None => write!(f, "none"),
            ExpertRequestStatus::Pending => write!(f, "pending"),
            ExpertRequestStatus::Approved => write!(f, "approved"),
            ExpertRequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// What a mutation needs; checked in one place instead of per-handler
/// role branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ReviewReport,
    AdminMutation,
}

impl UserRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Expert and admin submissions skip the pending queue
    pub fn is_privileged(&self) -> bool {
        matches!(self, UserRole::Expert | UserRole::Admin)
    }

    pub fn can(&self, capability: Capability) -> bool {
        match capability {
            Capability::ReviewReport => self.is_privileged(),
            Capability::AdminMutation => self.is_admin(),
        }
    }
}

/// Single authorization gate for every privileged lifecycle mutation.
/// Returns a typed decision; navigation concerns stay in the UI layer.
pub fn authorize(role: UserRole, capability: Capability) -> Result<()> {
    if role.can(capability) {
        Ok(())
    } else {
        let needed = match capability {
            Capability::ReviewReport => "Expert or admin access required",
            Capability::AdminMutation => "Admin access required",
        };
        Err(AppError::Forbidden(needed.to_string()))
    }
}

/// Database model for a user profile
#[derive(Debug, Clone, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub subject: String,
    pub email: Option<String>,
    pub role: UserRole,
    pub expert_request_status: ExpertRequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reviewer_capability_matches_role_hierarchy() {
        assert!(UserRole::Admin.can(Capability::ReviewReport));
        assert!(UserRole::Expert.can(Capability::ReviewReport));
        assert!(!UserRole::User.can(Capability::ReviewReport));
    }

    #[test]
    fn admin_mutations_are_admin_only() {
        assert!(UserRole::Admin.can(Capability::AdminMutation));
        assert!(!UserRole::Expert.can(Capability::AdminMutation));
        assert!(!UserRole::User.can(Capability::AdminMutation));
    }

    #[test]
    fn enum_display_matches_the_storage_spelling() {
        assert_eq!(UserRole::Expert.to_string(), "expert");
        assert_eq!(ExpertRequestStatus::None.to_string(), "none");
        assert_eq!(ExpertRequestStatus::Pending.to_string(), "pending");
        assert_eq!(ExpertRequestStatus::Approved.to_string(), "approved");
    }

    #[test]
    fn authorize_denies_without_mutating_anything() {
        let err = authorize(UserRole::User, Capability::ReviewReport).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(authorize(UserRole::Expert, Capability::ReviewReport).is_ok());
    }
}
