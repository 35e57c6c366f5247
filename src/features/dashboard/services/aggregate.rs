//! Pure reductions over grouped report rows. Everything here is
//! deterministic and side-effect free; the service layer owns the
//! queries and the cache.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::dashboard::dtos::{
    DailyTrendPointDto, HotZoneDto, MapPointDto, PestRankingEntryDto, ProvinceDistributionDto,
    TopPestDto,
};
use crate::shared::constants::PEST_RANKING_SIZE;

/// Per-pest grouped row as returned by the fan-out query
#[derive(Debug, Clone, FromRow)]
pub struct PestGroupRow {
    pub pest_id: Uuid,
    pub frequency: i64,
    pub total_area: f64,
    pub severity_sum: i64,
    pub incidence_sum: i64,
}

/// Per-province grouped row as returned by the fan-out query
#[derive(Debug, Clone, FromRow)]
pub struct ProvinceGroupRow {
    pub province_code: String,
    pub report_count: i64,
    pub total_area: f64,
    pub severity_sum: i64,
}

/// Percentage change against the previous period, rounded half away
/// from zero. A silent previous period reads as +100% regardless of the
/// current value, so a cold start never divides by zero.
pub fn trend_percent(current: f64, previous: f64) -> i64 {
    if previous == 0.0 {
        return 100;
    }
    ((current - previous) / previous * 100.0).round() as i64
}

/// Integer mean, rounded half away from zero; zero-count groups read as 0
pub fn rounded_mean(sum: i64, count: i64) -> i32 {
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round() as i32
}

/// Rank pests by total affected area, descending, truncated to the top
/// ten. The sort is stable, so equal areas keep their input order.
pub fn pest_ranking(
    rows: &[PestGroupRow],
    pest_names: &HashMap<Uuid, String>,
) -> Vec<PestRankingEntryDto> {
    let mut ranked: Vec<&PestGroupRow> = rows.iter().collect();
    ranked.sort_by(|a, b| {
        b.total_area
            .partial_cmp(&a.total_area)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(PEST_RANKING_SIZE);

    ranked
        .into_iter()
        .map(|row| PestRankingEntryDto {
            pest_id: row.pest_id,
            pest_name: display_name(pest_names, row.pest_id),
            frequency: row.frequency,
            total_area_rai: row.total_area,
            mean_severity: rounded_mean(row.severity_sum, row.frequency),
            mean_incidence: rounded_mean(row.incidence_sum, row.frequency),
        })
        .collect()
}

/// The single most frequently reported pest; the first row encountered
/// wins a frequency tie.
pub fn top_pest(
    rows: &[PestGroupRow],
    pest_names: &HashMap<Uuid, String>,
) -> Option<TopPestDto> {
    let mut best: Option<&PestGroupRow> = None;
    for row in rows {
        match best {
            Some(current) if row.frequency <= current.frequency => {}
            _ => best = Some(row),
        }
    }

    best.map(|row| TopPestDto {
        pest_id: row.pest_id,
        pest_name: display_name(pest_names, row.pest_id),
        frequency: row.frequency,
    })
}

/// Per-province distribution, descending by total affected area (stable
/// on ties)
pub fn geo_distribution(rows: &[ProvinceGroupRow]) -> Vec<ProvinceDistributionDto> {
    let mut sorted: Vec<&ProvinceGroupRow> = rows.iter().collect();
    sorted.sort_by(|a, b| {
        b.total_area
            .partial_cmp(&a.total_area)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    sorted
        .into_iter()
        .map(|row| ProvinceDistributionDto {
            province_code: row.province_code.clone(),
            report_count: row.report_count,
            total_area_rai: row.total_area,
            mean_severity: rounded_mean(row.severity_sum, row.report_count),
        })
        .collect()
}

/// The score a province competes on for the hot zone. Kept as its own
/// function so the formula stays in one place.
pub fn hot_zone_score(report_count: i64, mean_severity: f64, total_area: f64) -> f64 {
    report_count as f64 * mean_severity * total_area
}

/// The province maximizing the hot-zone score; first encountered wins
/// ties.
pub fn hot_zone(rows: &[ProvinceGroupRow]) -> Option<HotZoneDto> {
    let mut best: Option<(f64, &ProvinceGroupRow)> = None;
    for row in rows {
        let mean_severity = if row.report_count == 0 {
            0.0
        } else {
            row.severity_sum as f64 / row.report_count as f64
        };
        let score = hot_zone_score(row.report_count, mean_severity, row.total_area);
        match best {
            Some((best_score, _)) if score <= best_score => {}
            _ => best = Some((score, row)),
        }
    }

    best.map(|(score, row)| HotZoneDto {
        province_code: row.province_code.clone(),
        report_count: row.report_count,
        total_area_rai: row.total_area,
        mean_severity: rounded_mean(row.severity_sum, row.report_count),
        score,
    })
}

/// Bucket reported and symptom dates into one ascending per-day series.
/// Both axes count independently; a day appears once either touches it.
pub fn daily_series(dates: &[(NaiveDate, NaiveDate)]) -> Vec<DailyTrendPointDto> {
    let mut days: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
    for &(reported, symptom) in dates {
        days.entry(reported).or_default().0 += 1;
        days.entry(symptom).or_default().1 += 1;
    }

    days.into_iter()
        .map(|(day, (reported_count, symptom_count))| DailyTrendPointDto {
            day,
            reported_count,
            symptom_count,
        })
        .collect()
}

/// One located report row destined for the outbreak map
#[derive(Debug, Clone, FromRow)]
pub struct MapPointRow {
    pub id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub pest_id: Uuid,
    pub reported_date: NaiveDate,
    pub severity_percent: i32,
}

/// Annotate map rows with pest display names; unknown ids fall back to
/// the raw id.
pub fn map_points(rows: Vec<MapPointRow>, pest_names: &HashMap<Uuid, String>) -> Vec<MapPointDto> {
    rows.into_iter()
        .map(|row| MapPointDto {
            report_id: row.id,
            latitude: row.latitude,
            longitude: row.longitude,
            pest_name: display_name(pest_names, row.pest_id),
            reported_date: row.reported_date,
            severity_percent: row.severity_percent,
        })
        .collect()
}

fn display_name(pest_names: &HashMap<Uuid, String>, pest_id: Uuid) -> String {
    pest_names
        .get(&pest_id)
        .cloned()
        .unwrap_or_else(|| pest_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pest_row(frequency: i64, total_area: f64) -> PestGroupRow {
        PestGroupRow {
            pest_id: Uuid::new_v4(),
            frequency,
            total_area,
            severity_sum: frequency * 50,
            incidence_sum: frequency * 40,
        }
    }

    fn province_row(
        code: &str,
        report_count: i64,
        total_area: f64,
        severity_sum: i64,
    ) -> ProvinceGroupRow {
        ProvinceGroupRow {
            province_code: code.to_string(),
            report_count,
            total_area,
            severity_sum,
        }
    }

    #[test]
    fn trend_is_rounded_half_away_from_zero() {
        assert_eq!(trend_percent(150.0, 100.0), 50);
        assert_eq!(trend_percent(100.0, 150.0), -33);
        // 2.5% and -2.5% round away from zero
        assert_eq!(trend_percent(41.0, 40.0), 3);
        assert_eq!(trend_percent(39.0, 40.0), -3);
    }

    #[test]
    fn silent_previous_period_reads_as_plus_100() {
        assert_eq!(trend_percent(7.0, 0.0), 100);
        assert_eq!(trend_percent(0.0, 0.0), 100);
    }

    #[test]
    fn mean_rounds_half_away_from_zero() {
        assert_eq!(rounded_mean(5, 2), 3);
        assert_eq!(rounded_mean(-5, 2), -3);
        assert_eq!(rounded_mean(0, 0), 0);
    }

    #[test]
    fn ranking_is_descending_by_area_and_truncated() {
        let rows: Vec<PestGroupRow> = (0..12).map(|i| pest_row(1, i as f64)).collect();
        let ranking = pest_ranking(&rows, &HashMap::new());

        assert_eq!(ranking.len(), PEST_RANKING_SIZE);
        assert_eq!(ranking[0].total_area_rai, 11.0);
        assert_eq!(ranking[9].total_area_rai, 2.0);
    }

    #[test]
    fn ranking_ties_keep_input_order() {
        let rows = vec![pest_row(1, 5.0), pest_row(2, 5.0), pest_row(3, 5.0)];
        let ranking = pest_ranking(&rows, &HashMap::new());

        let order: Vec<Uuid> = ranking.iter().map(|e| e.pest_id).collect();
        let input: Vec<Uuid> = rows.iter().map(|r| r.pest_id).collect();
        assert_eq!(order, input);
    }

    #[test]
    fn unknown_pest_renders_as_its_id() {
        let rows = vec![pest_row(1, 5.0)];
        let ranking = pest_ranking(&rows, &HashMap::new());
        assert_eq!(ranking[0].pest_name, rows[0].pest_id.to_string());

        let mut names = HashMap::new();
        names.insert(rows[0].pest_id, "Brown planthopper".to_string());
        let ranking = pest_ranking(&rows, &names);
        assert_eq!(ranking[0].pest_name, "Brown planthopper");
    }

    #[test]
    fn top_pest_is_by_frequency_first_tie_wins() {
        let rows = vec![pest_row(3, 1.0), pest_row(5, 2.0), pest_row(5, 99.0)];
        let top = top_pest(&rows, &HashMap::new()).unwrap();

        assert_eq!(top.pest_id, rows[1].pest_id);
        assert_eq!(top.frequency, 5);
        assert!(top_pest(&[], &HashMap::new()).is_none());
    }

    #[test]
    fn hot_zone_maximizes_count_times_severity_times_area() {
        // TH-50: 2 reports, mean severity 60, area 10 -> 1200
        // TH-57: 4 reports, mean severity 50, area 8  -> 1600
        let rows = vec![
            province_row("TH-50", 2, 10.0, 120),
            province_row("TH-57", 4, 8.0, 200),
        ];
        let zone = hot_zone(&rows).unwrap();

        assert_eq!(zone.province_code, "TH-57");
        assert_eq!(zone.score, 1600.0);
        assert_eq!(zone.mean_severity, 50);
    }

    #[test]
    fn hot_zone_ties_go_to_the_first_row() {
        let rows = vec![
            province_row("TH-50", 1, 10.0, 50),
            province_row("TH-57", 1, 10.0, 50),
        ];
        assert_eq!(hot_zone(&rows).unwrap().province_code, "TH-50");
        assert!(hot_zone(&[]).is_none());
    }

    #[test]
    fn daily_series_counts_both_axes_ascending() {
        let d = |day: u32| NaiveDate::from_ymd_opt(2025, 6, day).unwrap();
        let series = daily_series(&[(d(3), d(1)), (d(3), d(3)), (d(2), d(1))]);

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].day, d(1));
        assert_eq!((series[0].reported_count, series[0].symptom_count), (0, 2));
        assert_eq!((series[1].reported_count, series[1].symptom_count), (1, 0));
        assert_eq!((series[2].reported_count, series[2].symptom_count), (2, 1));
    }

    #[test]
    fn geo_distribution_sorts_by_area_descending() {
        let rows = vec![
            province_row("TH-50", 1, 3.0, 40),
            province_row("TH-57", 1, 9.0, 40),
            province_row("TH-40", 1, 6.0, 40),
        ];
        let dist = geo_distribution(&rows);
        let codes: Vec<&str> = dist.iter().map(|d| d.province_code.as_str()).collect();
        assert_eq!(codes, vec!["TH-57", "TH-40", "TH-50"]);
    }

    // Two reports of 10 and 15 rai against a silent previous month: the
    // area sums to 25 and the trend pins at +100.
    #[test]
    fn area_reduction_over_a_cold_start() {
        let current = 10.0 + 15.0;
        assert_eq!(current, 25.0);
        assert_eq!(trend_percent(current, 0.0), 100);
    }

    // Previous period 40 rai, current 25: trend is -37.5, rounded away
    // from zero to -38.
    #[test]
    fn area_trend_against_an_active_previous_period() {
        assert_eq!(trend_percent(25.0, 40.0), -38);
    }
}
