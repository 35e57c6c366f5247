/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Maximum number of map points returned by the dashboard
pub const MAX_MAP_POINTS: i64 = 500;

/// Maximum entries in the pest ranking
pub const PEST_RANKING_SIZE: usize = 10;

/// Longest date range (in days, inclusive) the metrics endpoint accepts
pub const MAX_METRICS_RANGE_DAYS: i64 = 366;

/// Default metrics window when the caller supplies no range
pub const DEFAULT_METRICS_WINDOW_DAYS: i64 = 30;
