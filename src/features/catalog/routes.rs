use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::catalog::handlers;
use crate::features::catalog::services::CatalogService;

/// Create public catalog routes
pub fn routes(catalog_service: Arc<CatalogService>) -> Router {
    Router::new()
        .route("/api/catalog/pests", get(handlers::list_pests))
        .route("/api/catalog/plants", get(handlers::list_plants))
        .with_state(catalog_service)
}
