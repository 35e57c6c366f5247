use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::dashboard::dtos::{DashboardMetricsDto, MetricsQueryParams};
use crate::features::dashboard::services::MetricsService;
use crate::shared::types::ApiResponse;

/// Windowed dashboard metrics over approved reports
#[utoipa::path(
    get,
    path = "/api/dashboard/metrics",
    tag = "Dashboard",
    params(MetricsQueryParams),
    responses(
        (status = 200, description = "Computed metrics for the window", body = ApiResponse<DashboardMetricsDto>),
        (status = 400, description = "Invalid date window"),
        (status = 503, description = "Metrics temporarily unavailable")
    )
)]
pub async fn get_metrics(
    State(metrics_service): State<Arc<MetricsService>>,
    Query(params): Query<MetricsQueryParams>,
) -> Result<Json<ApiResponse<DashboardMetricsDto>>> {
    let metrics = metrics_service.get_metrics(&params).await?;
    Ok(Json(ApiResponse::success(Some(metrics), None, None)))
}
