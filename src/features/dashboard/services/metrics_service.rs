use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, FixedOffset, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::config::DashboardConfig;
use crate::core::error::{AppError, Result};
use crate::features::catalog::CatalogService;
use crate::features::dashboard::dtos::{
    AreaTrendDto, CountTrendDto, DashboardMetricsDto, MetricsQueryParams,
};
use crate::features::dashboard::services::aggregate::{
    self, MapPointRow, PestGroupRow, ProvinceGroupRow,
};
use crate::features::dashboard::services::MetricsCache;
use crate::shared::constants::{
    DEFAULT_METRICS_WINDOW_DAYS, MAX_MAP_POINTS, MAX_METRICS_RANGE_DAYS,
};

/// Read-only aggregation engine behind the dashboard endpoint.
///
/// Six independent reads fan out concurrently under one deadline; the
/// result is reduced in-process and cached per window. The engine never
/// returns a partial payload: the whole computation succeeds or the
/// caller gets an error.
pub struct MetricsService {
    pool: PgPool,
    catalog: Arc<CatalogService>,
    cache: MetricsCache,
    compute_deadline: Duration,
}

impl MetricsService {
    pub fn new(pool: PgPool, catalog: Arc<CatalogService>, config: &DashboardConfig) -> Self {
        Self {
            pool,
            catalog,
            cache: MetricsCache::new(config.cache_ttl),
            compute_deadline: config.compute_deadline,
        }
    }

    /// Resolve and validate the requested window; both bounds inclusive
    fn resolve_window(params: &MetricsQueryParams) -> Result<(NaiveDate, NaiveDate)> {
        let end = params.end_date.unwrap_or_else(|| {
            let ict = FixedOffset::east_opt(7 * 3600).expect("Invalid ICT offset");
            Utc::now().with_timezone(&ict).date_naive()
        });
        let start = match params.start_date {
            Some(start) => start,
            None => end
                .checked_sub_days(Days::new(DEFAULT_METRICS_WINDOW_DAYS as u64 - 1))
                .ok_or_else(|| AppError::BadRequest("Date window out of range".to_string()))?,
        };

        if start > end {
            return Err(AppError::BadRequest(
                "startDate must not be after endDate".to_string(),
            ));
        }
        if (end - start).num_days() + 1 > MAX_METRICS_RANGE_DAYS {
            return Err(AppError::BadRequest(format!(
                "Date range must not exceed {} days",
                MAX_METRICS_RANGE_DAYS
            )));
        }

        Ok((start, end))
    }

    /// Previous comparison period: the same inclusive length, ending the
    /// day before `start`. Windows whose comparison period would fall off
    /// the calendar are rejected up front rather than wrapped.
    fn previous_window(start: NaiveDate, end: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        let span = (end - start).num_days() as u64;
        let out_of_range = || AppError::BadRequest("Date window out of range".to_string());

        let prev_end = start.checked_sub_days(Days::new(1)).ok_or_else(out_of_range)?;
        let prev_start = prev_end
            .checked_sub_days(Days::new(span))
            .ok_or_else(out_of_range)?;
        Ok((prev_start, prev_end))
    }

    pub async fn get_metrics(&self, params: &MetricsQueryParams) -> Result<DashboardMetricsDto> {
        let (start, end) = Self::resolve_window(params)?;
        let (prev_start, prev_end) = Self::previous_window(start, end)?;

        if let Some(cached) = self.cache.get(start, end).await {
            tracing::debug!("Dashboard cache hit for {}..{}", start, end);
            return Ok(cached);
        }

        let metrics = tokio::time::timeout(
            self.compute_deadline,
            self.compute(start, end, prev_start, prev_end),
        )
        .await
            .map_err(|_| {
                tracing::error!(
                    "Dashboard computation for {}..{} exceeded {:?}",
                    start,
                    end,
                    self.compute_deadline
                );
                AppError::StoreUnavailable("Metrics computation deadline expired".to_string())
            })??;

        self.cache.put(start, end, metrics.clone()).await;
        Ok(metrics)
    }

    async fn compute(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        prev_start: NaiveDate,
        prev_end: NaiveDate,
    ) -> Result<DashboardMetricsDto> {
        let (counts, areas, pest_rows, province_rows, daily_dates, (map_rows, pest_names)) =
            tokio::try_join!(
                self.verified_counts(start, end, prev_start, prev_end),
                self.area_sums(start, end, prev_start, prev_end),
                self.pest_groups(start, end),
                self.province_groups(start, end),
                self.daily_dates(start, end),
                self.map_rows_with_names(start, end),
            )?;

        Ok(DashboardMetricsDto {
            start_date: start,
            end_date: end,
            verified_reports: CountTrendDto {
                current: counts.0,
                previous: counts.1,
                trend_percent: aggregate::trend_percent(counts.0 as f64, counts.1 as f64),
            },
            affected_area: AreaTrendDto {
                current_rai: areas.0,
                previous_rai: areas.1,
                trend_percent: aggregate::trend_percent(areas.0, areas.1),
            },
            pest_ranking: aggregate::pest_ranking(&pest_rows, &pest_names),
            top_pest: aggregate::top_pest(&pest_rows, &pest_names),
            geo_distribution: aggregate::geo_distribution(&province_rows),
            hot_zone: aggregate::hot_zone(&province_rows),
            daily_series: aggregate::daily_series(&daily_dates),
            map_points: aggregate::map_points(map_rows, &pest_names),
        })
    }

    async fn verified_counts(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        prev_start: NaiveDate,
        prev_end: NaiveDate,
    ) -> Result<(i64, i64)> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*) FILTER (WHERE reported_date BETWEEN $1 AND $2),
                    COUNT(*) FILTER (WHERE reported_date BETWEEN $3 AND $4)
             FROM reports
             WHERE status = 'approved' AND deleted_at IS NULL",
        )
        .bind(start)
        .bind(end)
        .bind(prev_start)
        .bind(prev_end)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count verified reports: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn area_sums(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        prev_start: NaiveDate,
        prev_end: NaiveDate,
    ) -> Result<(f64, f64)> {
        sqlx::query_as::<_, (f64, f64)>(
            "SELECT COALESCE(SUM(area_rai) FILTER (WHERE reported_date BETWEEN $1 AND $2), 0)::DOUBLE PRECISION,
                    COALESCE(SUM(area_rai) FILTER (WHERE reported_date BETWEEN $3 AND $4), 0)::DOUBLE PRECISION
             FROM reports
             WHERE status = 'approved' AND deleted_at IS NULL",
        )
        .bind(start)
        .bind(end)
        .bind(prev_start)
        .bind(prev_end)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to sum affected area: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn pest_groups(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<PestGroupRow>> {
        sqlx::query_as::<_, PestGroupRow>(
            "SELECT pest_id,
                    COUNT(*) AS frequency,
                    COALESCE(SUM(area_rai), 0)::DOUBLE PRECISION AS total_area,
                    COALESCE(SUM(severity_percent), 0)::BIGINT AS severity_sum,
                    COALESCE(SUM(incidence_percent), 0)::BIGINT AS incidence_sum
             FROM reports
             WHERE status = 'approved' AND deleted_at IS NULL
               AND reported_date BETWEEN $1 AND $2
             GROUP BY pest_id
             ORDER BY pest_id",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to group reports by pest: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn province_groups(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ProvinceGroupRow>> {
        sqlx::query_as::<_, ProvinceGroupRow>(
            "SELECT province_code,
                    COUNT(*) AS report_count,
                    COALESCE(SUM(area_rai), 0)::DOUBLE PRECISION AS total_area,
                    COALESCE(SUM(severity_percent), 0)::BIGINT AS severity_sum
             FROM reports
             WHERE status = 'approved' AND deleted_at IS NULL
               AND reported_date BETWEEN $1 AND $2
             GROUP BY province_code
             ORDER BY province_code",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to group reports by province: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn daily_dates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(NaiveDate, NaiveDate)>> {
        sqlx::query_as::<_, (NaiveDate, NaiveDate)>(
            "SELECT reported_date, symptom_date
             FROM reports
             WHERE status = 'approved' AND deleted_at IS NULL
               AND reported_date BETWEEN $1 AND $2",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch daily trend dates: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Map rows plus the pest display-name lookup they are annotated with
    async fn map_rows_with_names(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(Vec<MapPointRow>, HashMap<Uuid, String>)> {
        let rows = sqlx::query_as::<_, MapPointRow>(
            "SELECT id, latitude, longitude, pest_id, reported_date, severity_percent
             FROM reports
             WHERE status = 'approved' AND deleted_at IS NULL
               AND reported_date BETWEEN $1 AND $2
               AND latitude <> 0
             ORDER BY created_at DESC
             LIMIT $3",
        )
        .bind(start)
        .bind(end)
        .bind(MAX_MAP_POINTS)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch map points: {:?}", e);
            AppError::Database(e)
        })?;

        let names = self.catalog.pest_name_map().await?;
        Ok((rows, names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: Option<(i32, u32, u32)>, end: Option<(i32, u32, u32)>) -> MetricsQueryParams {
        let date = |(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        MetricsQueryParams {
            start_date: start.map(date),
            end_date: end.map(date),
        }
    }

    #[test]
    fn explicit_window_is_used_as_given() {
        let params = window(Some((2025, 6, 1)), Some((2025, 6, 30)));
        let (start, end) = MetricsService::resolve_window(&params).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
    }

    #[test]
    fn missing_start_defaults_to_a_30_day_window() {
        let params = window(None, Some((2025, 6, 30)));
        let (start, end) = MetricsService::resolve_window(&params).unwrap();
        assert_eq!((end - start).num_days() + 1, DEFAULT_METRICS_WINDOW_DAYS);
    }

    #[test]
    fn inverted_window_is_rejected() {
        let params = window(Some((2025, 6, 30)), Some((2025, 6, 1)));
        assert!(matches!(
            MetricsService::resolve_window(&params),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn previous_window_immediately_precedes_with_equal_length() {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();

        let (prev_start, prev_end) = MetricsService::previous_window(start, end).unwrap();
        assert_eq!(prev_end, NaiveDate::from_ymd_opt(2025, 5, 31).unwrap());
        assert_eq!(prev_start, NaiveDate::from_ymd_opt(2025, 5, 2).unwrap());
        assert_eq!(prev_end - prev_start, end - start);
    }

    #[test]
    fn window_at_the_calendar_edge_is_rejected() {
        // A window starting on the first representable date has no
        // preceding period; this must surface as a 400, not a panic
        assert!(matches!(
            MetricsService::previous_window(NaiveDate::MIN, NaiveDate::MIN),
            Err(AppError::BadRequest(_))
        ));

        // One day in: the previous period's end exists but its start does not
        let start = NaiveDate::MIN.checked_add_days(Days::new(1)).unwrap();
        let end = NaiveDate::MIN.checked_add_days(Days::new(5)).unwrap();
        assert!(matches!(
            MetricsService::previous_window(start, end),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn oversized_window_is_rejected() {
        // 366 inclusive days is the cap; one more is an error
        let params = window(Some((2024, 1, 1)), Some((2024, 12, 31)));
        assert!(MetricsService::resolve_window(&params).is_ok());

        let params = window(Some((2024, 1, 1)), Some((2025, 1, 1)));
        assert!(matches!(
            MetricsService::resolve_window(&params),
            Err(AppError::BadRequest(_))
        ));
    }
}
