use std::sync::Arc;

use chrono::{FixedOffset, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::audit::{actions, ActivityLogService};
use crate::features::auth::CallerIdentity;
use crate::features::notifications::model::NotificationKind;
use crate::features::notifications::NotificationService;
use crate::features::rate_limits::RateLimitService;
use crate::features::reports::dtos::CreateReportDto;
use crate::features::reports::models::{NewReport, Report, ReporterDetails};
use crate::features::reports::services::report_service::{ReportService, REPORT_COLUMNS};
use crate::features::reports::services::review_policy;
use crate::features::users::model::{authorize, Capability, UserProfile};
use crate::features::users::ProfileService;

/// Lifecycle controller for outbreak reports: submission, review
/// decisions, and soft deletion.
///
/// Notifications are best-effort side effects of a review decision; a
/// notification failure is logged and swallowed, never rolled back into
/// the decision itself.
pub struct ReviewService {
    pool: PgPool,
    reports: Arc<ReportService>,
    profiles: Arc<ProfileService>,
    notifications: Arc<NotificationService>,
    rate_limits: Arc<RateLimitService>,
}

impl ReviewService {
    pub fn new(
        pool: PgPool,
        reports: Arc<ReportService>,
        profiles: Arc<ProfileService>,
        notifications: Arc<NotificationService>,
        rate_limits: Arc<RateLimitService>,
    ) -> Self {
        Self {
            pool,
            reports,
            profiles,
            notifications,
            rate_limits,
        }
    }

    /// Submit a report. Authenticated callers are rate-limited and synced
    /// to a profile first; reports from reviewers are auto-approved.
    pub async fn submit(
        &self,
        identity: Option<&CallerIdentity>,
        dto: CreateReportDto,
    ) -> Result<Report> {
        let submitter = match identity {
            Some(identity) => {
                self.rate_limits
                    .check_submission_allowed(&identity.subject)
                    .await?;
                Some(self.profiles.sync_profile(identity).await?)
            }
            None => None,
        };

        let status = review_policy::initial_status(submitter.as_ref().map(|p| p.role));
        let verified_by = if review_policy::stamps_verification(status) {
            submitter.as_ref().map(|p| p.id)
        } else {
            None
        };

        // Default the observation date to today in ICT, where the reports
        // originate.
        let reported_date = dto.reported_date.unwrap_or_else(|| {
            let ict = FixedOffset::east_opt(7 * 3600).expect("Invalid ICT offset");
            Utc::now().with_timezone(&ict).date_naive()
        });

        if dto.symptom_date > reported_date {
            return Err(AppError::Validation(
                "Symptom date cannot be after the reported date".to_string(),
            ));
        }

        let new_report = NewReport {
            plant_id: dto.plant_id,
            pest_id: dto.pest_id,
            province_code: dto.province_code,
            latitude: dto.latitude,
            longitude: dto.longitude,
            symptom_date: dto.symptom_date,
            reported_date,
            area_rai: dto.area_rai,
            incidence_percent: dto.incidence_percent,
            severity_percent: dto.severity_percent,
            image_urls: dto.image_urls,
            image_captions: dto.image_captions,
            is_anonymous: dto.is_anonymous,
            reporter: ReporterDetails {
                first_name: dto.reporter_first_name,
                last_name: dto.reporter_last_name,
                phone: dto.reporter_phone,
                role_code: dto.reporter_role_code,
            },
            submitter_subject: submitter.as_ref().map(|p| p.subject.clone()),
            submitter_email: submitter.as_ref().and_then(|p| p.email.clone()),
            status,
            verified_by,
        };

        self.reports.insert(&new_report).await
    }

    /// Approve a report. Requires the review capability; any live report
    /// is eligible, and repeating the current decision is an idempotent
    /// rewrite.
    pub async fn approve(
        &self,
        report_id: Uuid,
        reviewer: &CallerIdentity,
        note: Option<&str>,
    ) -> Result<Report> {
        let reviewer_profile = self.require_reviewer(reviewer).await?;
        let write = review_policy::approval_write(note);
        let updated = self
            .apply_decision(report_id, reviewer_profile.id, &write)
            .await?;

        tracing::info!(
            "Report {} approved by {}",
            updated.id,
            reviewer_profile.id
        );

        self.notify_submitter(
            &updated,
            NotificationKind::Verified,
            "Your outbreak report has been approved",
        )
        .await;

        Ok(updated)
    }

    /// Reject a report with a mandatory reason. Approved reports may be
    /// rejected on re-review.
    pub async fn reject(
        &self,
        report_id: Uuid,
        reviewer: &CallerIdentity,
        reason: &str,
    ) -> Result<Report> {
        let reviewer_profile = self.require_reviewer(reviewer).await?;
        let write = review_policy::rejection_write(reason)?;
        let updated = self
            .apply_decision(report_id, reviewer_profile.id, &write)
            .await?;
        let reason = write.rejection_reason.as_deref().unwrap_or_default();

        tracing::info!(
            "Report {} rejected by {}: {}",
            updated.id,
            reviewer_profile.id,
            reason
        );

        self.notify_submitter(
            &updated,
            NotificationKind::Rejected,
            &format!("Your outbreak report was rejected: {}", reason),
        )
        .await;

        Ok(updated)
    }

    /// Soft-delete a report, keeping its row for the audit trail. The
    /// deletion and its audit entry commit in one transaction.
    pub async fn soft_delete(&self, report_id: Uuid, actor: &CallerIdentity) -> Result<()> {
        let actor_profile = self.profiles.sync_profile(actor).await?;
        authorize(actor_profile.role, Capability::AdminMutation)?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let deleted = sqlx::query_scalar::<_, Uuid>(
            "UPDATE reports SET deleted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING id",
        )
        .bind(report_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to soft-delete report: {:?}", e);
            AppError::Database(e)
        })?;

        if deleted.is_none() {
            return Err(AppError::NotFound(format!("Report {} not found", report_id)));
        }

        ActivityLogService::append_tx(
            &mut tx,
            actor_profile.id,
            actions::REPORT_SOFT_DELETE,
            "report",
            &report_id.to_string(),
            serde_json::json!({}),
        )
        .await?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit soft delete: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Report {} soft-deleted by {}", report_id, actor_profile.id);
        Ok(())
    }

    /// Persist a review decision. Any live report is eligible; the update
    /// stamps the verification pair and rewrites the reason column with
    /// whatever the decision carries.
    async fn apply_decision(
        &self,
        report_id: Uuid,
        reviewer_id: Uuid,
        write: &review_policy::DecisionWrite,
    ) -> Result<Report> {
        sqlx::query_as::<_, Report>(&format!(
            "UPDATE reports
             SET status = $2, verified_at = NOW(), verified_by = $3,
                 rejection_reason = $4, updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {REPORT_COLUMNS}"
        ))
        .bind(report_id)
        .bind(write.status)
        .bind(reviewer_id)
        .bind(&write.rejection_reason)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to apply review decision: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Report {} not found", report_id)))
    }

    async fn require_reviewer(&self, reviewer: &CallerIdentity) -> Result<UserProfile> {
        let profile = self.profiles.sync_profile(reviewer).await?;
        authorize(profile.role, Capability::ReviewReport)?;
        Ok(profile)
    }

    /// Tell the submitter about a review outcome. Anonymous and unlinked
    /// reports have nobody to notify; delivery failures are logged only.
    async fn notify_submitter(&self, report: &Report, kind: NotificationKind, message: &str) {
        let Some(subject) = report.submitter_subject.as_deref() else {
            return;
        };

        let outcome = async {
            let profile = self.profiles.find_by_subject(subject).await?;
            if let Some(profile) = profile {
                self.notifications
                    .append(profile.id, kind, message, report.id)
                    .await?;
            }
            Ok::<_, AppError>(())
        }
        .await;

        if let Err(e) = outcome {
            tracing::warn!(
                "Failed to notify submitter of report {}: {:?}",
                report.id,
                e
            );
        }
    }
}
