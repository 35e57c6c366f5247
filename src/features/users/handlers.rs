use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::admin::dtos::UserProfileDto;
use crate::features::auth::CallerIdentity;
use crate::features::users::ProfileService;
use crate::shared::types::ApiResponse;

/// The caller's own profile, created on first use
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Caller's profile", body = ApiResponse<UserProfileDto>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(
    identity: CallerIdentity,
    State(profile_service): State<Arc<ProfileService>>,
) -> Result<Json<ApiResponse<UserProfileDto>>> {
    let profile = profile_service.sync_profile(&identity).await?;
    Ok(Json(ApiResponse::success(Some(profile.into()), None, None)))
}

/// Ask to be reviewed for the expert role
#[utoipa::path(
    post,
    path = "/api/users/expert-request",
    tag = "Users",
    responses(
        (status = 200, description = "Request recorded", body = ApiResponse<UserProfileDto>),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Already privileged or already pending")
    ),
    security(("bearer_auth" = []))
)]
pub async fn request_expert(
    identity: CallerIdentity,
    State(profile_service): State<Arc<ProfileService>>,
) -> Result<Json<ApiResponse<UserProfileDto>>> {
    let profile = profile_service.request_expert(&identity).await?;
    Ok(Json(ApiResponse::success(
        Some(profile.into()),
        Some("Expert request recorded".to_string()),
        None,
    )))
}
