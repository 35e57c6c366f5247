use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Query window for the metrics endpoint; defaults to the trailing
/// 30 days when omitted
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
pub struct MetricsQueryParams {
    #[param(example = "2025-06-01")]
    pub start_date: Option<NaiveDate>,
    #[param(example = "2025-06-30")]
    pub end_date: Option<NaiveDate>,
}

/// Count metric with its previous-period comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountTrendDto {
    pub current: i64,
    pub previous: i64,
    pub trend_percent: i64,
}

/// Affected-area metric (rai) with its previous-period comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AreaTrendDto {
    pub current_rai: f64,
    pub previous_rai: f64,
    pub trend_percent: i64,
}

/// One pest in the area-ranked top list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PestRankingEntryDto {
    pub pest_id: Uuid,
    pub pest_name: String,
    pub frequency: i64,
    pub total_area_rai: f64,
    pub mean_severity: i32,
    pub mean_incidence: i32,
}

/// The single most frequently reported pest in the window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopPestDto {
    pub pest_id: Uuid,
    pub pest_name: String,
    pub frequency: i64,
}

/// Per-province rollup, sorted by total affected area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceDistributionDto {
    pub province_code: String,
    pub report_count: i64,
    pub total_area_rai: f64,
    pub mean_severity: i32,
}

/// The province maximizing the hot-zone score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HotZoneDto {
    pub province_code: String,
    pub report_count: i64,
    pub total_area_rai: f64,
    pub mean_severity: i32,
    pub score: f64,
}

/// Daily activity counters; a day appears once either axis touches it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyTrendPointDto {
    pub day: NaiveDate,
    pub reported_count: i64,
    pub symptom_count: i64,
}

/// One located report for the outbreak map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapPointDto {
    pub report_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub pest_name: String,
    pub reported_date: NaiveDate,
    pub severity_percent: i32,
}

/// Complete dashboard payload; always whole, never partial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetricsDto {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub verified_reports: CountTrendDto,
    pub affected_area: AreaTrendDto,
    pub pest_ranking: Vec<PestRankingEntryDto>,
    pub top_pest: Option<TopPestDto>,
    pub geo_distribution: Vec<ProvinceDistributionDto>,
    pub hot_zone: Option<HotZoneDto>,
    pub daily_series: Vec<DailyTrendPointDto>,
    pub map_points: Vec<MapPointDto>,
}
