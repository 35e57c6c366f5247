pub mod aggregate;
pub mod metrics_cache;
pub mod metrics_service;

pub use metrics_cache::MetricsCache;
pub use metrics_service::MetricsService;
