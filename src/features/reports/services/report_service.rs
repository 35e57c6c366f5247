use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{NewReport, Report, ReportStatus};

pub(crate) const REPORT_COLUMNS: &str = "id, plant_id, pest_id, province_code, latitude, longitude, \
     symptom_date, reported_date, area_rai, incidence_percent, severity_percent, \
     image_urls, image_captions, is_anonymous, \
     reporter_first_name, reporter_last_name, reporter_phone, reporter_role_code, \
     submitter_subject, submitter_email, status, verified_at, verified_by, \
     rejection_reason, deleted_at, created_at, updated_at";

/// Data access for outbreak reports
pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, data: &NewReport) -> Result<Report> {
        let report = sqlx::query_as::<_, Report>(&format!(
            "INSERT INTO reports (
                plant_id, pest_id, province_code, latitude, longitude,
                symptom_date, reported_date, area_rai, incidence_percent, severity_percent,
                image_urls, image_captions, is_anonymous,
                reporter_first_name, reporter_last_name, reporter_phone, reporter_role_code,
                submitter_subject, submitter_email, status, verified_at, verified_by
             )
             VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20,
                CASE WHEN $20 = 'approved'::report_status THEN NOW() END, $21
             )
             RETURNING {REPORT_COLUMNS}"
        ))
        .bind(data.plant_id)
        .bind(data.pest_id)
        .bind(&data.province_code)
        .bind(data.latitude)
        .bind(data.longitude)
        .bind(data.symptom_date)
        .bind(data.reported_date)
        .bind(data.area_rai)
        .bind(data.incidence_percent)
        .bind(data.severity_percent)
        .bind(&data.image_urls)
        .bind(&data.image_captions)
        .bind(data.is_anonymous)
        .bind(&data.reporter.first_name)
        .bind(&data.reporter.last_name)
        .bind(&data.reporter.phone)
        .bind(&data.reporter.role_code)
        .bind(&data.submitter_subject)
        .bind(&data.submitter_email)
        .bind(data.status)
        .bind(data.verified_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert report: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Created report {} in {} ({})",
            report.id,
            report.province_code,
            report.status
        );

        Ok(report)
    }

    /// Admin listing across all live reports, optionally filtered by status
    pub async fn list_all(
        &self,
        status: Option<ReportStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Report>, i64)> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reports
             WHERE deleted_at IS NULL AND ($1::report_status IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count reports: {:?}", e);
            AppError::Database(e)
        })?;

        let reports = sqlx::query_as::<_, Report>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports
             WHERE deleted_at IS NULL AND ($1::report_status IS NULL OR status = $1)
             ORDER BY created_at DESC
             OFFSET $2 LIMIT $3"
        ))
        .bind(status)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reports: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((reports, total))
    }

    /// Every live report matching the filter, for CSV export
    pub async fn list_all_unpaged(&self, status: Option<ReportStatus>) -> Result<Vec<Report>> {
        let reports = sqlx::query_as::<_, Report>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports
             WHERE deleted_at IS NULL AND ($1::report_status IS NULL OR status = $1)
             ORDER BY created_at DESC"
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to export reports: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(reports)
    }
}
