use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::users::handlers;
use crate::features::users::ProfileService;

/// Profile routes; a valid token is required upstream
pub fn routes(profile_service: Arc<ProfileService>) -> Router {
    Router::new()
        .route("/api/users/me", get(handlers::get_me))
        .route("/api/users/expert-request", post(handlers::request_expert))
        .with_state(profile_service)
}
