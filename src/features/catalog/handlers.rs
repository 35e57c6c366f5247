use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::catalog::model::{Pest, Plant};
use crate::features::catalog::services::CatalogService;
use crate::shared::types::ApiResponse;

/// List pest master data
#[utoipa::path(
    get,
    path = "/api/catalog/pests",
    tag = "Catalog",
    responses(
        (status = 200, description = "Pest list", body = ApiResponse<Vec<Pest>>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_pests(
    State(service): State<Arc<CatalogService>>,
) -> Result<Json<ApiResponse<Vec<Pest>>>> {
    let pests = service.list_pests().await?;
    Ok(Json(ApiResponse::success(Some(pests), None, None)))
}

/// List plant master data
#[utoipa::path(
    get,
    path = "/api/catalog/plants",
    tag = "Catalog",
    responses(
        (status = 200, description = "Plant list", body = ApiResponse<Vec<Plant>>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_plants(
    State(service): State<Arc<CatalogService>>,
) -> Result<Json<ApiResponse<Vec<Plant>>>> {
    let plants = service.list_plants().await?;
    Ok(Json(ApiResponse::success(Some(plants), None, None)))
}
