use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::catalog::model::{Pest, Plant};

/// Read-only access to the pest/plant master data
pub struct CatalogService {
    pool: PgPool,
}

impl CatalogService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_pests(&self) -> Result<Vec<Pest>> {
        let pests = sqlx::query_as::<_, Pest>("SELECT id, name FROM pests ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list pests: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(pests)
    }

    pub async fn list_plants(&self) -> Result<Vec<Plant>> {
        let plants = sqlx::query_as::<_, Plant>("SELECT id, name FROM plants ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list plants: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(plants)
    }

    /// id -> display name map for enrichment. An unknown id is rendered as
    /// the id itself by callers, so misses here are not errors.
    pub async fn pest_name_map(&self) -> Result<HashMap<Uuid, String>> {
        let pests = self.list_pests().await?;
        Ok(pests.into_iter().map(|p| (p.id, p.name)).collect())
    }

    pub async fn plant_name_map(&self) -> Result<HashMap<Uuid, String>> {
        let plants = self.list_plants().await?;
        Ok(plants.into_iter().map(|p| (p.id, p.name)).collect())
    }
}
