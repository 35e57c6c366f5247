use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, OptionalIdentity};
use crate::features::auth::CallerIdentity;
use crate::features::reports::dtos::{
    ApproveReportDto, CreateReportDto, RejectReportDto, ReportResponseDto, SubmitReportResponseDto,
};
use crate::features::reports::services::ReviewService;
use crate::shared::types::ApiResponse;

#[derive(Clone)]
pub struct ReportState {
    pub review_service: Arc<ReviewService>,
}

/// Submit an outbreak report. Works for anonymous callers; a valid
/// bearer token links the report to the caller's profile.
#[utoipa::path(
    post,
    path = "/api/reports",
    tag = "Reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report submitted", body = ApiResponse<SubmitReportResponseDto>),
        (status = 400, description = "Validation failed"),
        (status = 429, description = "Daily report limit reached")
    )
)]
pub async fn submit_report(
    OptionalIdentity(identity): OptionalIdentity,
    State(state): State<ReportState>,
    AppJson(payload): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<SubmitReportResponseDto>>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = state
        .review_service
        .submit(identity.as_ref(), payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(SubmitReportResponseDto {
                id: report.id,
                status: report.status,
            }),
            Some("Report submitted".to_string()),
            None,
        )),
    ))
}

/// Approve a report (expert/admin)
#[utoipa::path(
    post,
    path = "/api/reports/{id}/approve",
    tag = "Reports",
    params(("id" = Uuid, Path, description = "Report id")),
    request_body = ApproveReportDto,
    responses(
        (status = 200, description = "Report approved", body = ApiResponse<ReportResponseDto>),
        (status = 403, description = "Caller cannot review reports"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn approve_report(
    identity: CallerIdentity,
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<ApproveReportDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state
        .review_service
        .approve(id, &identity, payload.note.as_deref())
        .await?;

    Ok(Json(ApiResponse::success(
        Some(report.into()),
        Some("Report approved".to_string()),
        None,
    )))
}

/// Reject a report with a reason (expert/admin)
#[utoipa::path(
    post,
    path = "/api/reports/{id}/reject",
    tag = "Reports",
    params(("id" = Uuid, Path, description = "Report id")),
    request_body = RejectReportDto,
    responses(
        (status = 200, description = "Report rejected", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Missing rejection reason"),
        (status = 403, description = "Caller cannot review reports"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reject_report(
    identity: CallerIdentity,
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<RejectReportDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = state
        .review_service
        .reject(id, &identity, &payload.reason)
        .await?;

    Ok(Json(ApiResponse::success(
        Some(report.into()),
        Some("Report rejected".to_string()),
        None,
    )))
}
