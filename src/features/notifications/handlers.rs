use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::auth::CallerIdentity;
use crate::features::notifications::model::Notification;
use crate::features::notifications::services::NotificationService;
use crate::features::users::ProfileService;
use crate::shared::types::{ApiResponse, Meta, PaginationParams};

#[derive(Clone)]
pub struct NotificationState {
    pub notification_service: Arc<NotificationService>,
    pub profile_service: Arc<ProfileService>,
}

/// List the caller's notifications, newest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "Notifications",
    params(PaginationParams),
    responses(
        (status = 200, description = "Caller's notifications", body = ApiResponse<Vec<Notification>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_notifications(
    identity: CallerIdentity,
    State(state): State<NotificationState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<Notification>>>> {
    let profile = state.profile_service.sync_profile(&identity).await?;
    let (notifications, total) = state
        .notification_service
        .list_for_user(profile.id, params.offset(), params.limit())
        .await?;

    Ok(Json(ApiResponse::success(
        Some(notifications),
        None,
        Some(Meta { total }),
    )))
}
