use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Pest master-data entry. Managed elsewhere; read-only here.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Pest {
    pub id: Uuid,
    pub name: String,
}

/// Plant master-data entry. Managed elsewhere; read-only here.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Plant {
    pub id: Uuid,
    pub name: String,
}
