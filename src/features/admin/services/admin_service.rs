use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::admin::services::export;
use crate::features::audit::{actions, ActivityLogEntry, ActivityLogService};
use crate::features::auth::CallerIdentity;
use crate::features::catalog::CatalogService;
use crate::features::reports::models::{Report, ReportStatus};
use crate::features::reports::services::ReportService;
use crate::features::users::model::{authorize, Capability, UserProfile, UserRole};
use crate::features::users::ProfileService;

const PROFILE_COLUMNS: &str =
    "id, subject, email, role, expert_request_status, created_at, updated_at";

/// Admin console operations. Every mutation writes its activity-log
/// entry in the same transaction, so the audit trail cannot drift from
/// the data it describes.
pub struct AdminService {
    pool: PgPool,
    profiles: Arc<ProfileService>,
    reports: Arc<ReportService>,
    catalog: Arc<CatalogService>,
    audit: Arc<ActivityLogService>,
}

impl AdminService {
    pub fn new(
        pool: PgPool,
        profiles: Arc<ProfileService>,
        reports: Arc<ReportService>,
        catalog: Arc<CatalogService>,
        audit: Arc<ActivityLogService>,
    ) -> Self {
        Self {
            pool,
            profiles,
            reports,
            catalog,
            audit,
        }
    }

    async fn require_admin(&self, actor: &CallerIdentity) -> Result<UserProfile> {
        let profile = self.profiles.sync_profile(actor).await?;
        authorize(profile.role, Capability::AdminMutation)?;
        Ok(profile)
    }

    /// All live reports, optionally filtered by status
    pub async fn list_reports(
        &self,
        actor: &CallerIdentity,
        status: Option<ReportStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Report>, i64)> {
        self.require_admin(actor).await?;
        self.reports.list_all(status, offset, limit).await
    }

    pub async fn list_users(
        &self,
        actor: &CallerIdentity,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<UserProfile>, i64)> {
        self.require_admin(actor).await?;
        self.profiles.list(offset, limit).await
    }

    pub async fn list_activity_logs(
        &self,
        actor: &CallerIdentity,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<ActivityLogEntry>, i64)> {
        self.require_admin(actor).await?;
        self.audit.list(offset, limit).await
    }

    /// Change a user's role, auditing the old and new values
    pub async fn change_role(
        &self,
        actor: &CallerIdentity,
        profile_id: Uuid,
        new_role: UserRole,
    ) -> Result<UserProfile> {
        let admin = self.require_admin(actor).await?;
        let current = self.profiles.get_by_id(profile_id).await?;

        if current.role == new_role {
            return Ok(current);
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let updated = sqlx::query_as::<_, UserProfile>(&format!(
            "UPDATE user_profiles SET role = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(profile_id)
        .bind(new_role)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to change role: {:?}", e);
            AppError::Database(e)
        })?;

        ActivityLogService::append_tx(
            &mut tx,
            admin.id,
            actions::USER_ROLE_CHANGE,
            "user_profile",
            &profile_id.to_string(),
            serde_json::json!({
                "old_role": current.role,
                "new_role": new_role,
            }),
        )
        .await?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit role change: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Role of profile {} changed {} -> {} by {}",
            profile_id,
            current.role,
            new_role,
            admin.id
        );
        Ok(updated)
    }

    /// Approve a pending expert request, promoting the role to expert
    pub async fn approve_expert_request(
        &self,
        actor: &CallerIdentity,
        profile_id: Uuid,
    ) -> Result<UserProfile> {
        let admin = self.require_admin(actor).await?;
        let current = self.profiles.get_by_id(profile_id).await?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let updated = sqlx::query_as::<_, UserProfile>(&format!(
            "UPDATE user_profiles
             SET expert_request_status = 'approved', role = 'expert', updated_at = NOW()
             WHERE id = $1 AND expert_request_status = 'pending'
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(profile_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to approve expert request: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| {
            AppError::Conflict(format!("User {} has no pending expert request", profile_id))
        })?;

        ActivityLogService::append_tx(
            &mut tx,
            admin.id,
            actions::EXPERT_REQUEST_APPROVE,
            "user_profile",
            &profile_id.to_string(),
            serde_json::json!({
                "old_role": current.role,
                "new_role": updated.role,
            }),
        )
        .await?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit expert approval: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Expert request of profile {} approved by {}",
            profile_id,
            admin.id
        );
        Ok(updated)
    }

    /// Reject a pending expert request; the role stays unchanged
    pub async fn reject_expert_request(
        &self,
        actor: &CallerIdentity,
        profile_id: Uuid,
    ) -> Result<UserProfile> {
        let admin = self.require_admin(actor).await?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let updated = sqlx::query_as::<_, UserProfile>(&format!(
            "UPDATE user_profiles
             SET expert_request_status = 'rejected', updated_at = NOW()
             WHERE id = $1 AND expert_request_status = 'pending'
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(profile_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to reject expert request: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| {
            AppError::Conflict(format!("User {} has no pending expert request", profile_id))
        })?;

        ActivityLogService::append_tx(
            &mut tx,
            admin.id,
            actions::EXPERT_REQUEST_REJECT,
            "user_profile",
            &profile_id.to_string(),
            serde_json::json!({ "role": updated.role }),
        )
        .await?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit expert rejection: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Expert request of profile {} rejected by {}",
            profile_id,
            admin.id
        );
        Ok(updated)
    }

    pub async fn export_reports_csv(&self, actor: &CallerIdentity) -> Result<String> {
        self.require_admin(actor).await?;

        let reports = self.reports.list_all_unpaged(None).await?;
        let plant_names = self.catalog.plant_name_map().await?;
        let pest_names = self.catalog.pest_name_map().await?;

        Ok(export::reports_csv(&reports, &plant_names, &pest_names))
    }

    pub async fn export_users_csv(&self, actor: &CallerIdentity) -> Result<String> {
        self.require_admin(actor).await?;

        // One unpaged read; the user table stays small in practice
        let (profiles, _) = self.profiles.list(0, i64::MAX).await?;
        Ok(export::users_csv(&profiles))
    }
}
