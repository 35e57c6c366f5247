use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::CallerIdentity;
use crate::features::users::model::{ExpertRequestStatus, UserProfile};

const PROFILE_COLUMNS: &str =
    "id, subject, email, role, expert_request_status, created_at, updated_at";

/// Service for resolving and maintaining user profiles
pub struct ProfileService {
    pool: PgPool,
}

impl ProfileService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_subject(&self, subject: &str) -> Result<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE subject = $1"
        ))
        .bind(subject)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up profile by subject: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(profile)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<UserProfile> {
        let profile = sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch profile: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        Ok(profile)
    }

    /// Resolve the caller to a profile, creating one on first use.
    ///
    /// Two handlers may race to create the same profile; the insert uses
    /// ON CONFLICT DO NOTHING and the loser re-reads by subject. Only when
    /// that retry also comes back empty is the sync surfaced as a failure.
    pub async fn sync_profile(&self, identity: &CallerIdentity) -> Result<UserProfile> {
        if let Some(existing) = self.find_by_subject(&identity.subject).await? {
            return Ok(existing);
        }

        let inserted = sqlx::query_as::<_, UserProfile>(&format!(
            "INSERT INTO user_profiles (subject, email) VALUES ($1, $2)
             ON CONFLICT (subject) DO NOTHING
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(&identity.subject)
        .bind(&identity.email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create profile: {:?}", e);
            AppError::Database(e)
        })?;

        if let Some(profile) = inserted {
            tracing::info!("Created profile {} for subject {}", profile.id, profile.subject);
            return Ok(profile);
        }

        // Lost the insert race; the winner's row must be visible now
        self.find_by_subject(&identity.subject)
            .await?
            .ok_or_else(|| {
                AppError::ProfileSync(format!(
                    "Profile for subject {} could not be created or found",
                    identity.subject
                ))
            })
    }

    /// List profiles for the admin console
    pub async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<UserProfile>, i64)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_profiles")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count profiles: {:?}", e);
                AppError::Database(e)
            })?;

        let profiles = sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM user_profiles
             ORDER BY created_at DESC
             OFFSET $1 LIMIT $2"
        ))
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list profiles: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((profiles, total))
    }

    /// Caller asks to be reviewed for the expert role
    pub async fn request_expert(&self, identity: &CallerIdentity) -> Result<UserProfile> {
        let profile = self.sync_profile(identity).await?;

        if profile.role.is_privileged() {
            return Err(AppError::Conflict(
                "Caller already has review access".to_string(),
            ));
        }
        if profile.expert_request_status == ExpertRequestStatus::Pending {
            return Err(AppError::Conflict(
                "An expert request is already pending".to_string(),
            ));
        }

        let updated = sqlx::query_as::<_, UserProfile>(&format!(
            "UPDATE user_profiles
             SET expert_request_status = 'pending', updated_at = NOW()
             WHERE id = $1
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(profile.id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record expert request: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Profile {} requested expert review", updated.id);
        Ok(updated)
    }
}
