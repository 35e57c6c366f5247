mod core;
mod features;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::admin::{routes as admin_routes, AdminService};
use crate::features::audit::ActivityLogService;
use crate::features::auth::TokenValidator;
use crate::features::catalog::{routes as catalog_routes, CatalogService};
use crate::features::dashboard::{routes as dashboard_routes, MetricsService};
use crate::features::notifications::{routes as notifications_routes, NotificationService};
use crate::features::rate_limits::RateLimitService;
use crate::features::reports::{routes as reports_routes, ReportService, ReviewService};
use crate::features::users::{routes as users_routes, ProfileService};
use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations automatically
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Token validation (issuance lives upstream at the gateway)
    let token_validator = Arc::new(TokenValidator::new(&config.auth));
    tracing::info!("Auth configuration initialized");

    // Core services
    let profile_service = Arc::new(ProfileService::new(pool.clone()));
    let catalog_service = Arc::new(CatalogService::new(pool.clone()));
    let notification_service = Arc::new(NotificationService::new(pool.clone()));
    let activity_log_service = Arc::new(ActivityLogService::new(pool.clone()));
    let report_service = Arc::new(ReportService::new(pool.clone()));
    let rate_limit_service = Arc::new(RateLimitService::new(
        pool.clone(),
        config.app.daily_report_limit,
    ));
    tracing::info!("Core services initialized");

    // Report lifecycle controller
    let review_service = Arc::new(ReviewService::new(
        pool.clone(),
        Arc::clone(&report_service),
        Arc::clone(&profile_service),
        Arc::clone(&notification_service),
        Arc::clone(&rate_limit_service),
    ));
    tracing::info!("Review service initialized");

    // Dashboard aggregation engine
    let metrics_service = Arc::new(MetricsService::new(
        pool.clone(),
        Arc::clone(&catalog_service),
        &config.dashboard,
    ));
    tracing::info!(
        "Metrics service initialized (cache TTL {:?}, deadline {:?})",
        config.dashboard.cache_ttl,
        config.dashboard.compute_deadline
    );

    // Admin console
    let admin_service = Arc::new(AdminService::new(
        pool.clone(),
        Arc::clone(&profile_service),
        Arc::clone(&report_service),
        Arc::clone(&catalog_service),
        Arc::clone(&activity_log_service),
    ));
    tracing::info!("Admin service initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Protected routes (require a valid bearer token)
    let protected_routes = Router::new()
        .merge(users_routes::routes(Arc::clone(&profile_service)))
        .merge(notifications_routes::routes(
            Arc::clone(&notification_service),
            Arc::clone(&profile_service),
        ))
        .merge(reports_routes::review_routes(Arc::clone(&review_service)))
        .merge(admin_routes::routes(
            Arc::clone(&admin_service),
            Arc::clone(&review_service),
        ))
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&token_validator),
            middleware::auth_middleware,
        ));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    // Public routes; a valid token attaches the caller identity, an
    // absent or invalid one leaves the request anonymous
    let public_routes = Router::new()
        .merge(reports_routes::public_routes(Arc::clone(&review_service)))
        .merge(dashboard_routes::routes(Arc::clone(&metrics_service)))
        .merge(catalog_routes::routes(Arc::clone(&catalog_service)))
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&token_validator),
            middleware::optional_auth_middleware,
        ));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_route)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(65535)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
