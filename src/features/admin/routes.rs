use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::features::admin::handlers::{self, AdminState};
use crate::features::admin::services::AdminService;
use crate::features::reports::services::ReviewService;

/// Admin console routes; a valid token is required upstream and every
/// operation re-checks the admin capability itself
pub fn routes(admin_service: Arc<AdminService>, review_service: Arc<ReviewService>) -> Router {
    let state = AdminState {
        admin_service,
        review_service,
    };

    Router::new()
        .route("/api/admin/reports", get(handlers::list_reports))
        .route("/api/admin/reports/{id}", delete(handlers::delete_report))
        .route("/api/admin/users", get(handlers::list_users))
        .route("/api/admin/users/{id}/role", patch(handlers::change_role))
        .route(
            "/api/admin/users/{id}/expert-request/approve",
            post(handlers::approve_expert_request),
        )
        .route(
            "/api/admin/users/{id}/expert-request/reject",
            post(handlers::reject_expert_request),
        )
        .route("/api/admin/export/reports.csv", get(handlers::export_reports))
        .route("/api/admin/export/users.csv", get(handlers::export_users))
        .route(
            "/api/admin/activity-logs",
            get(handlers::list_activity_logs),
        )
        .with_state(state)
}
