//! Flat CSV renderings of reports and users for the admin export
//! endpoints. Pure string assembly; the service layer fetches the rows.

use std::collections::HashMap;

use uuid::Uuid;

use crate::features::reports::models::Report;
use crate::features::users::model::UserProfile;
use crate::shared::csv::write_row;

fn name_or_id(names: &HashMap<Uuid, String>, id: Uuid) -> String {
    names.get(&id).cloned().unwrap_or_else(|| id.to_string())
}

/// Denormalized report rows: catalog ids are resolved to display names
pub fn reports_csv(
    reports: &[Report],
    plant_names: &HashMap<Uuid, String>,
    pest_names: &HashMap<Uuid, String>,
) -> String {
    let mut out = String::new();
    write_row(
        &mut out,
        &[
            "id",
            "status",
            "province_code",
            "plant",
            "pest",
            "symptom_date",
            "reported_date",
            "area_rai",
            "incidence_percent",
            "severity_percent",
            "latitude",
            "longitude",
            "is_anonymous",
            "submitter_subject",
            "rejection_reason",
            "created_at",
        ],
    );

    for report in reports {
        write_row(
            &mut out,
            &[
                &report.id.to_string(),
                &report.status.to_string(),
                &report.province_code,
                &name_or_id(plant_names, report.plant_id),
                &name_or_id(pest_names, report.pest_id),
                &report.symptom_date.to_string(),
                &report.reported_date.to_string(),
                &report.area_rai.to_string(),
                &report.incidence_percent.to_string(),
                &report.severity_percent.to_string(),
                &report.latitude.to_string(),
                &report.longitude.to_string(),
                &report.is_anonymous.to_string(),
                report.submitter_subject.as_deref().unwrap_or(""),
                report.rejection_reason.as_deref().unwrap_or(""),
                &report.created_at.to_rfc3339(),
            ],
        );
    }

    out
}

pub fn users_csv(profiles: &[UserProfile]) -> String {
    let mut out = String::new();
    write_row(
        &mut out,
        &[
            "id",
            "subject",
            "email",
            "role",
            "expert_request_status",
            "created_at",
        ],
    );

    for profile in profiles {
        write_row(
            &mut out,
            &[
                &profile.id.to_string(),
                &profile.subject,
                profile.email.as_deref().unwrap_or(""),
                &profile.role.to_string(),
                &profile.expert_request_status.to_string(),
                &profile.created_at.to_rfc3339(),
            ],
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use crate::features::reports::models::ReportStatus;
    use crate::features::users::model::{ExpertRequestStatus, UserRole};

    fn sample_report() -> Report {
        Report {
            id: Uuid::new_v4(),
            plant_id: Uuid::new_v4(),
            pest_id: Uuid::new_v4(),
            province_code: "TH-50".to_string(),
            latitude: 18.79,
            longitude: 98.98,
            symptom_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            reported_date: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
            area_rai: 12.5,
            incidence_percent: 40,
            severity_percent: 55,
            image_urls: vec!["https://img.example/1.jpg".to_string()],
            image_captions: vec!["".to_string()],
            is_anonymous: false,
            reporter_first_name: None,
            reporter_last_name: None,
            reporter_phone: None,
            reporter_role_code: None,
            submitter_subject: Some("auth0|farmer".to_string()),
            submitter_email: None,
            status: ReportStatus::Rejected,
            verified_at: Some(Utc.with_ymd_and_hms(2025, 6, 4, 8, 0, 0).unwrap()),
            verified_by: Some(Uuid::new_v4()),
            rejection_reason: Some("blurry, duplicate \"photo\"".to_string()),
            deleted_at: None,
            created_at: Utc.with_ymd_and_hms(2025, 6, 3, 9, 30, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 6, 4, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn report_rows_resolve_names_and_escape_fields() {
        let report = sample_report();
        let mut pests = HashMap::new();
        pests.insert(report.pest_id, "Brown planthopper".to_string());

        let csv = reports_csv(&[report.clone()], &HashMap::new(), &pests);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("id,status,province_code"));
        assert!(lines[1].contains("Brown planthopper"));
        // Unknown plant id falls back to the raw id
        assert!(lines[1].contains(&report.plant_id.to_string()));
        // The comma-and-quote reason is wrapped and doubled
        assert!(lines[1].contains("\"blurry, duplicate \"\"photo\"\"\""));
    }

    #[test]
    fn user_rows_are_flat() {
        let profile = UserProfile {
            id: Uuid::new_v4(),
            subject: "auth0|farmer".to_string(),
            email: None,
            role: UserRole::Expert,
            expert_request_status: ExpertRequestStatus::Approved,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        };

        let csv = users_csv(&[profile]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("auth0|farmer"));
        assert!(lines[1].contains("expert"));
        assert!(lines[1].contains("approved"));
    }
}
