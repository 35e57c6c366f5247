use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Utc};
use sqlx::PgPool;

use crate::core::error::{AppError, Result};

/// Service for enforcing the per-submitter daily report quota.
///
/// Anonymous submissions are not counted; the quota only applies to
/// authenticated submitters, keyed by their token subject.
pub struct RateLimitService {
    pool: PgPool,
    daily_report_limit: i64,
}

impl RateLimitService {
    pub fn new(pool: PgPool, daily_report_limit: i64) -> Self {
        Self {
            pool,
            daily_report_limit,
        }
    }

    /// Get the start and end of today in ICT (UTC+7), converted to UTC
    fn ict_day_bounds() -> (DateTime<Utc>, DateTime<Utc>) {
        let ict = FixedOffset::east_opt(7 * 3600).expect("Invalid ICT offset");
        let now_ict = Utc::now().with_timezone(&ict);

        let start_of_day_ict = ict
            .with_ymd_and_hms(now_ict.year(), now_ict.month(), now_ict.day(), 0, 0, 0)
            .single()
            .expect("Invalid ICT date");

        let start_utc = start_of_day_ict.with_timezone(&Utc);
        let end_utc = (start_of_day_ict + chrono::Duration::days(1)).with_timezone(&Utc);

        (start_utc, end_utc)
    }

    /// Count reports submitted by this subject today (ICT day)
    pub async fn count_reports_today(&self, subject: &str) -> Result<i64> {
        let (start_utc, end_utc) = Self::ict_day_bounds();

        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM reports
            WHERE submitter_subject = $1
              AND created_at >= $2
              AND created_at < $3
            "#,
        )
        .bind(subject)
        .bind(start_utc)
        .bind(end_utc)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count submitter reports today: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(count)
    }

    /// Reject with RateLimitExceeded once the submitter hits the daily
    /// quota; a non-positive limit disables the check
    pub async fn check_submission_allowed(&self, subject: &str) -> Result<()> {
        if self.daily_report_limit <= 0 {
            return Ok(());
        }

        let count = self.count_reports_today(subject).await?;
        if count >= self.daily_report_limit {
            tracing::warn!(
                "Submitter {} hit the daily report limit ({})",
                subject,
                self.daily_report_limit
            );
            return Err(AppError::RateLimitExceeded(format!(
                "Daily report limit of {} reached",
                self.daily_report_limit
            )));
        }
        Ok(())
    }
}
