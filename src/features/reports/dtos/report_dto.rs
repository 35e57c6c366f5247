use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::reports::models::{Report, ReportStatus};

/// Request DTO for submitting an outbreak report
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_report"))]
pub struct CreateReportDto {
    pub plant_id: Uuid,
    pub pest_id: Uuid,

    #[validate(regex(
        path = "*crate::shared::validation::PROVINCE_CODE_REGEX",
        message = "Province code must look like TH-50"
    ))]
    pub province_code: String,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude out of range"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude out of range"))]
    pub longitude: f64,

    /// Date symptoms were first observed
    pub symptom_date: NaiveDate,
    /// Observation date; defaults to today when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_date: Option<NaiveDate>,

    #[validate(range(min = 0.0, message = "Affected area must not be negative"))]
    pub area_rai: f64,
    #[validate(range(min = 0, max = 100, message = "Incidence must be within 0-100"))]
    pub incidence_percent: i32,
    #[validate(range(min = 0, max = 100, message = "Severity must be within 0-100"))]
    pub severity_percent: i32,

    #[validate(length(min = 1, message = "no-images"))]
    pub image_urls: Vec<String>,
    /// One caption per image URL; empty strings allowed
    #[serde(default)]
    pub image_captions: Vec<String>,

    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter_first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter_last_name: Option<String>,
    #[validate(regex(
        path = "*crate::shared::validation::PHONE_REGEX",
        message = "Reporter phone is not a valid phone number"
    ))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter_role_code: Option<String>,
}

fn validate_create_report(dto: &CreateReportDto) -> Result<(), ValidationError> {
    if dto.image_urls.len() != dto.image_captions.len() {
        return Err(ValidationError::new("caption_count_mismatch")
            .with_message("Each image URL needs exactly one caption".into()));
    }

    if dto.is_anonymous
        && (dto.reporter_first_name.is_some()
            || dto.reporter_last_name.is_some()
            || dto.reporter_phone.is_some()
            || dto.reporter_role_code.is_some())
    {
        return Err(ValidationError::new("anonymous_with_reporter_details")
            .with_message("Anonymous reports must not carry reporter details".into()));
    }

    Ok(())
}

/// Request DTO for approving a report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveReportDto {
    /// Optional reviewer annotation stored with the report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Request DTO for rejecting a report
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectReportDto {
    #[validate(length(min = 1, message = "reason required"))]
    pub reason: String,
}

/// Response DTO for a submitted/reviewed report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponseDto {
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
    pub status: ReportStatus,
    pub verified_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            plant_id: r.plant_id,
            pest_id: r.pest_id,
            province_code: r.province_code,
            latitude: r.latitude,
            longitude: r.longitude,
            symptom_date: r.symptom_date,
            reported_date: r.reported_date,
            area_rai: r.area_rai,
            incidence_percent: r.incidence_percent,
            severity_percent: r.severity_percent,
            image_urls: r.image_urls,
            image_captions: r.image_captions,
            is_anonymous: r.is_anonymous,
            status: r.status,
            verified_at: r.verified_at,
            rejection_reason: r.rejection_reason,
            created_at: r.created_at,
        }
    }
}

/// Response DTO returned right after submission
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportResponseDto {
    pub id: Uuid,
    pub status: ReportStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_dto() -> CreateReportDto {
        CreateReportDto {
            plant_id: Uuid::new_v4(),
            pest_id: Uuid::new_v4(),
            province_code: "TH-50".to_string(),
            latitude: 18.79,
            longitude: 98.98,
            symptom_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            reported_date: None,
            area_rai: 12.5,
            incidence_percent: 40,
            severity_percent: 55,
            image_urls: vec!["https://img.example/1.jpg".to_string()],
            image_captions: vec!["".to_string()],
            is_anonymous: true,
            reporter_first_name: None,
            reporter_last_name: None,
            reporter_phone: None,
            reporter_role_code: None,
        }
    }

    #[test]
    fn valid_submission_passes() {
        assert!(base_dto().validate().is_ok());
    }

    #[test]
    fn submission_without_images_fails() {
        let mut dto = base_dto();
        dto.image_urls.clear();
        dto.image_captions.clear();
        let err = dto.validate().unwrap_err();
        assert!(err.to_string().contains("no-images"));
    }

    #[test]
    fn caption_count_must_match_image_count() {
        let mut dto = base_dto();
        dto.image_captions.clear();
        assert!(dto.validate().is_err());

        dto.image_captions = vec!["a".to_string(), "b".to_string()];
        assert!(dto.validate().is_err());

        dto.image_captions = vec!["a".to_string()];
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn percentages_are_bounded() {
        let mut dto = base_dto();
        dto.incidence_percent = 101;
        assert!(dto.validate().is_err());

        let mut dto = base_dto();
        dto.severity_percent = -1;
        assert!(dto.validate().is_err());
    }

    #[test]
    fn anonymous_reports_reject_reporter_details() {
        let mut dto = base_dto();
        dto.reporter_first_name = Some("Ping".to_string());
        assert!(dto.validate().is_err());

        dto.is_anonymous = false;
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn rejection_reason_must_be_non_empty() {
        let dto = RejectReportDto {
            reason: String::new(),
        };
        assert!(dto.validate().is_err());

        let dto = RejectReportDto {
            reason: "blurry photo".to_string(),
        };
        assert!(dto.validate().is_ok());
    }
}
