use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Report status enum matching the `report_status` database enum.
///
/// The legacy `verified` value is collapsed to `approved` by migration;
/// runtime code only ever sees these three states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "pending"),
            ReportStatus::Approved => write!(f, "approved"),
            ReportStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Database model for an outbreak report
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub plant_id: Uuid,
    pub pest_id: Uuid,
    pub province_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub symptom_date: NaiveDate,
    pub reported_date: NaiveDate,
    pub area_rai: f64,
    pub incidence_percent: i32,
    pub severity_percent: i32,
    pub image_urls: Vec<String>,
    pub image_captions: Vec<String>,
    pub is_anonymous: bool,
    pub reporter_first_name: Option<String>,
    pub reporter_last_name: Option<String>,
    pub reporter_phone: Option<String>,
    pub reporter_role_code: Option<String>,
    pub submitter_subject: Option<String>,
    pub submitter_email: Option<String>,
    pub status: ReportStatus,
    pub verified_at: Option<DateTime<Utc>>,
    pub verified_by: Option<Uuid>,
    pub rejection_reason: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Named reporter details carried on non-anonymous submissions
#[derive(Debug, Clone, Default)]
pub struct ReporterDetails {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role_code: Option<String>,
}

/// Data for inserting a new report, assembled by the lifecycle controller
/// after validation and initial-status resolution.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub plant_id: Uuid,
    pub pest_id: Uuid,
    pub province_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub symptom_date: NaiveDate,
    pub reported_date: NaiveDate,
    pub area_rai: f64,
    pub incidence_percent: i32,
    pub severity_percent: i32,
    pub image_urls: Vec<String>,
    pub image_captions: Vec<String>,
    pub is_anonymous: bool,
    pub reporter: ReporterDetails,
    pub submitter_subject: Option<String>,
    pub submitter_email: Option<String>,
    pub status: ReportStatus,
    /// Set when a privileged submitter's report is auto-approved
    pub verified_by: Option<Uuid>,
}
