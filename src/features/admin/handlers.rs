use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::admin::dtos::{ChangeRoleDto, ReportFilterParams, UserProfileDto};
use crate::features::admin::services::AdminService;
use crate::features::audit::ActivityLogEntry;
use crate::features::auth::CallerIdentity;
use crate::features::reports::dtos::ReportResponseDto;
use crate::features::reports::services::ReviewService;
use crate::shared::types::{ApiResponse, Meta, PaginationParams};

#[derive(Clone)]
pub struct AdminState {
    pub admin_service: Arc<AdminService>,
    pub review_service: Arc<ReviewService>,
}

/// All live reports across statuses (admin)
#[utoipa::path(
    get,
    path = "/api/admin/reports",
    tag = "Admin",
    params(ReportFilterParams, PaginationParams),
    responses(
        (status = 200, description = "Reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_reports(
    identity: CallerIdentity,
    State(state): State<AdminState>,
    Query(filter): Query<ReportFilterParams>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let (reports, total) = state
        .admin_service
        .list_reports(&identity, filter.status, params.offset(), params.limit())
        .await?;

    let reports = reports.into_iter().map(ReportResponseDto::from).collect();
    Ok(Json(ApiResponse::success(
        Some(reports),
        None,
        Some(Meta { total }),
    )))
}

/// Soft-delete a report (admin)
#[utoipa::path(
    delete,
    path = "/api/admin/reports/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Report id")),
    responses(
        (status = 200, description = "Report deleted"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_report(
    identity: CallerIdentity,
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    state.review_service.soft_delete(id, &identity).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Report deleted".to_string()),
        None,
    )))
}

/// List user profiles (admin)
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    params(PaginationParams),
    responses(
        (status = 200, description = "User profiles", body = ApiResponse<Vec<UserProfileDto>>),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    identity: CallerIdentity,
    State(state): State<AdminState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<UserProfileDto>>>> {
    let (profiles, total) = state
        .admin_service
        .list_users(&identity, params.offset(), params.limit())
        .await?;

    let profiles = profiles.into_iter().map(UserProfileDto::from).collect();
    Ok(Json(ApiResponse::success(
        Some(profiles),
        None,
        Some(Meta { total }),
    )))
}

/// Change a user's role (admin)
#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}/role",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Profile id")),
    request_body = ChangeRoleDto,
    responses(
        (status = 200, description = "Role changed", body = ApiResponse<UserProfileDto>),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn change_role(
    identity: CallerIdentity,
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<ChangeRoleDto>,
) -> Result<Json<ApiResponse<UserProfileDto>>> {
    let profile = state
        .admin_service
        .change_role(&identity, id, payload.role)
        .await?;

    Ok(Json(ApiResponse::success(
        Some(profile.into()),
        Some("Role updated".to_string()),
        None,
    )))
}

/// Approve a pending expert request (admin)
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/expert-request/approve",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Profile id")),
    responses(
        (status = 200, description = "Request approved", body = ApiResponse<UserProfileDto>),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "No pending expert request")
    ),
    security(("bearer_auth" = []))
)]
pub async fn approve_expert_request(
    identity: CallerIdentity,
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserProfileDto>>> {
    let profile = state
        .admin_service
        .approve_expert_request(&identity, id)
        .await?;

    Ok(Json(ApiResponse::success(
        Some(profile.into()),
        Some("Expert request approved".to_string()),
        None,
    )))
}

/// Reject a pending expert request (admin)
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/expert-request/reject",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Profile id")),
    responses(
        (status = 200, description = "Request rejected", body = ApiResponse<UserProfileDto>),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "No pending expert request")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reject_expert_request(
    identity: CallerIdentity,
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserProfileDto>>> {
    let profile = state
        .admin_service
        .reject_expert_request(&identity, id)
        .await?;

    Ok(Json(ApiResponse::success(
        Some(profile.into()),
        Some("Expert request rejected".to_string()),
        None,
    )))
}

/// Export all live reports as CSV (admin)
#[utoipa::path(
    get,
    path = "/api/admin/export/reports.csv",
    tag = "Admin",
    responses(
        (status = 200, description = "CSV export", content_type = "text/csv"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn export_reports(
    identity: CallerIdentity,
    State(state): State<AdminState>,
) -> Result<impl IntoResponse> {
    let csv = state.admin_service.export_reports_csv(&identity).await?;
    Ok(csv_response("reports.csv", csv))
}

/// Export all user profiles as CSV (admin)
#[utoipa::path(
    get,
    path = "/api/admin/export/users.csv",
    tag = "Admin",
    responses(
        (status = 200, description = "CSV export", content_type = "text/csv"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn export_users(
    identity: CallerIdentity,
    State(state): State<AdminState>,
) -> Result<impl IntoResponse> {
    let csv = state.admin_service.export_users_csv(&identity).await?;
    Ok(csv_response("users.csv", csv))
}

/// Paginated audit trail (admin)
#[utoipa::path(
    get,
    path = "/api/admin/activity-logs",
    tag = "Admin",
    params(PaginationParams),
    responses(
        (status = 200, description = "Activity log entries", body = ApiResponse<Vec<ActivityLogEntry>>),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_activity_logs(
    identity: CallerIdentity,
    State(state): State<AdminState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<ActivityLogEntry>>>> {
    let (entries, total) = state
        .admin_service
        .list_activity_logs(&identity, params.offset(), params.limit())
        .await?;

    Ok(Json(ApiResponse::success(
        Some(entries),
        None,
        Some(Meta { total }),
    )))
}

fn csv_response(filename: &str, csv: String) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    )
}
