use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::audit::model::ActivityLogEntry;
use crate::features::catalog::{handlers as catalog_handlers, model as catalog_model};
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::notifications::{handlers as notifications_handlers, model as notifications_model};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::users::{handlers as users_handlers, model as users_model};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Reports
        reports_handlers::submit_report,
        reports_handlers::approve_report,
        reports_handlers::reject_report,
        // Dashboard (public)
        dashboard_handlers::get_metrics,
        // Catalog (public)
        catalog_handlers::list_pests,
        catalog_handlers::list_plants,
        // Users
        users_handlers::get_me,
        users_handlers::request_expert,
        // Notifications
        notifications_handlers::list_notifications,
        // Admin
        admin_handlers::list_reports,
        admin_handlers::delete_report,
        admin_handlers::list_users,
        admin_handlers::change_role,
        admin_handlers::approve_expert_request,
        admin_handlers::reject_expert_request,
        admin_handlers::export_reports,
        admin_handlers::export_users,
        admin_handlers::list_activity_logs,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Reports
            reports_models::ReportStatus,
            reports_dtos::CreateReportDto,
            reports_dtos::ApproveReportDto,
            reports_dtos::RejectReportDto,
            reports_dtos::ReportResponseDto,
            reports_dtos::SubmitReportResponseDto,
            ApiResponse<reports_dtos::SubmitReportResponseDto>,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            // Dashboard
            dashboard_dtos::CountTrendDto,
            dashboard_dtos::AreaTrendDto,
            dashboard_dtos::PestRankingEntryDto,
            dashboard_dtos::TopPestDto,
            dashboard_dtos::ProvinceDistributionDto,
            dashboard_dtos::HotZoneDto,
            dashboard_dtos::DailyTrendPointDto,
            dashboard_dtos::MapPointDto,
            dashboard_dtos::DashboardMetricsDto,
            ApiResponse<dashboard_dtos::DashboardMetricsDto>,
            // Catalog
            catalog_model::Pest,
            catalog_model::Plant,
            ApiResponse<Vec<catalog_model::Pest>>,
            ApiResponse<Vec<catalog_model::Plant>>,
            // Users
            users_model::UserRole,
            users_model::ExpertRequestStatus,
            // Notifications
            notifications_model::NotificationKind,
            notifications_model::Notification,
            ApiResponse<Vec<notifications_model::Notification>>,
            // Admin
            admin_dtos::ChangeRoleDto,
            admin_dtos::UserProfileDto,
            ApiResponse<admin_dtos::UserProfileDto>,
            ApiResponse<Vec<admin_dtos::UserProfileDto>>,
            ActivityLogEntry,
            ApiResponse<Vec<ActivityLogEntry>>,
        )
    ),
    tags(
        (name = "Reports", description = "Outbreak report submission and review"),
        (name = "Dashboard", description = "Public outbreak metrics"),
        (name = "Catalog", description = "Pest and plant master data (public)"),
        (name = "Users", description = "Caller profile and expert requests"),
        (name = "Notifications", description = "Review-outcome notifications"),
        (name = "Admin", description = "Admin console (admin only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Phytowatch API",
        version = "0.1.0",
        description = "API documentation for Phytowatch",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
