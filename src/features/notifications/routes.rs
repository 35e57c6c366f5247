use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::notifications::handlers::{self, NotificationState};
use crate::features::notifications::services::NotificationService;
use crate::features::users::ProfileService;

/// Create protected notification routes
pub fn routes(
    notification_service: Arc<NotificationService>,
    profile_service: Arc<ProfileService>,
) -> Router {
    let state = NotificationState {
        notification_service,
        profile_service,
    };

    Router::new()
        .route("/api/notifications", get(handlers::list_notifications))
        .with_state(state)
}
