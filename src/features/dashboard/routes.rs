use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::dashboard::handlers;
use crate::features::dashboard::services::MetricsService;

/// Create public dashboard routes
pub fn routes(metrics_service: Arc<MetricsService>) -> Router {
    Router::new()
        .route("/api/dashboard/metrics", get(handlers::get_metrics))
        .with_state(metrics_service)
}
