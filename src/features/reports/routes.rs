use axum::{routing::post, Router};
use std::sync::Arc;

use crate::features::reports::handlers::{self, ReportState};
use crate::features::reports::services::ReviewService;

/// Submission route; identity is optional here
pub fn public_routes(review_service: Arc<ReviewService>) -> Router {
    let state = ReportState { review_service };

    Router::new()
        .route("/api/reports", post(handlers::submit_report))
        .with_state(state)
}

/// Review routes; a valid token is required upstream
pub fn review_routes(review_service: Arc<ReviewService>) -> Router {
    let state = ReportState { review_service };

    Router::new()
        .route("/api/reports/{id}/approve", post(handlers::approve_report))
        .route("/api/reports/{id}/reject", post(handlers::reject_report))
        .with_state(state)
}
