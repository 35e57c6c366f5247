use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::core::config::DatabaseConfig;

/// Open the Postgres pool sized and timed from config. The first
/// connection is established eagerly, so an unreachable database fails
/// startup instead of the first request.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    tracing::debug!(
        "Opening Postgres pool ({}..{} connections, acquire timeout {:?})",
        config.min_connections,
        config.max_connections,
        config.acquire_timeout
    );

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect(&config.url)
        .await
}
