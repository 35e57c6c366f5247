use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::features::dashboard::dtos::DashboardMetricsDto;

struct CacheEntry {
    stored_at: Instant,
    metrics: DashboardMetricsDto,
}

/// Process-local cache of computed dashboard payloads, keyed by the
/// inclusive date window. Concurrent misses may both compute; the last
/// writer wins, which is fine for idempotent reads.
pub struct MetricsCache {
    ttl: Duration,
    entries: RwLock<HashMap<(NaiveDate, NaiveDate), CacheEntry>>,
}

impl MetricsCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, start: NaiveDate, end: NaiveDate) -> Option<DashboardMetricsDto> {
        let entries = self.entries.read().await;
        entries
            .get(&(start, end))
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.metrics.clone())
    }

    pub async fn put(&self, start: NaiveDate, end: NaiveDate, metrics: DashboardMetricsDto) {
        let mut entries = self.entries.write().await;
        // Expired windows nobody asks for again would otherwise pile up
        entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        entries.insert(
            (start, end),
            CacheEntry {
                stored_at: Instant::now(),
                metrics,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::dashboard::dtos::{AreaTrendDto, CountTrendDto};

    fn sample(start: NaiveDate, end: NaiveDate) -> DashboardMetricsDto {
        DashboardMetricsDto {
            start_date: start,
            end_date: end,
            verified_reports: CountTrendDto {
                current: 1,
                previous: 0,
                trend_percent: 100,
            },
            affected_area: AreaTrendDto {
                current_rai: 2.5,
                previous_rai: 0.0,
                trend_percent: 100,
            },
            pest_ranking: vec![],
            top_pest: None,
            geo_distribution: vec![],
            hot_zone: None,
            daily_series: vec![],
            map_points: vec![],
        }
    }

    #[tokio::test]
    async fn hit_within_ttl_miss_after() {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();

        let cache = MetricsCache::new(Duration::from_secs(60));
        assert!(cache.get(start, end).await.is_none());

        cache.put(start, end, sample(start, end)).await;
        assert!(cache.get(start, end).await.is_some());

        // Zero TTL expires immediately
        let cache = MetricsCache::new(Duration::ZERO);
        cache.put(start, end, sample(start, end)).await;
        assert!(cache.get(start, end).await.is_none());
    }

    #[tokio::test]
    async fn windows_are_cached_independently() {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let other_end = NaiveDate::from_ymd_opt(2025, 7, 31).unwrap();

        let cache = MetricsCache::new(Duration::from_secs(60));
        cache.put(start, end, sample(start, end)).await;

        assert!(cache.get(start, end).await.is_some());
        assert!(cache.get(start, other_end).await.is_none());
    }
}
