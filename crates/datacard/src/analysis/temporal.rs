//! Range, gap and distribution analysis for date/time fields.

use chrono::{NaiveDateTime, TimeDelta, Timelike};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::input::format_timestamp;

/// Maximum number of calendar dates in a daily distribution.
pub const MAX_DAILY_BUCKETS: usize = 100;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// First and last timestamp with the whole-day span between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Option<String>,
    pub end: Option<String>,
    pub days: i64,
}

/// Gaps longer than one day between consecutive timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapStats {
    pub count: usize,
    pub max_gap_days: i64,
    /// Mean of the flagged gaps in whole days; absent when there are none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_gap_days: Option<i64>,
}

impl GapStats {
    fn none() -> Self {
        Self {
            count: 0,
            max_gap_days: 0,
            avg_gap_days: None,
        }
    }
}

/// Bucketed counts of timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Distribution {
    /// Counts per hour of day, used when any value carries a time of day.
    Hourly(IndexMap<u32, usize>),
    /// Counts per calendar date, ascending, first [`MAX_DAILY_BUCKETS`] dates.
    Daily(IndexMap<String, usize>),
}

/// Statistics for a temporal field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalStats {
    pub range: TimeRange,
    pub gaps: Option<GapStats>,
    pub distribution: Option<Distribution>,
}

impl TemporalStats {
    /// Statistics for a field without parsable values.
    pub fn empty() -> Self {
        Self {
            range: TimeRange {
                start: None,
                end: None,
                days: 0,
            },
            gaps: None,
            distribution: None,
        }
    }
}

/// Computes [`TemporalStats`] for one field.
#[derive(Debug, Clone, Default)]
pub struct TemporalAnalyzer;

impl TemporalAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze the parsed timestamps of a field, in record order.
    pub fn analyze(&self, timestamps: &[NaiveDateTime]) -> TemporalStats {
        if timestamps.is_empty() {
            return TemporalStats::empty();
        }

        let mut sorted = timestamps.to_vec();
        sorted.sort();

        let (start, end) = (sorted[0], sorted[sorted.len() - 1]);
        let range = TimeRange {
            start: Some(format_timestamp(&start)),
            end: Some(format_timestamp(&end)),
            days: (end - start).num_days(),
        };

        TemporalStats {
            range,
            gaps: Some(analyze_gaps(&sorted)),
            distribution: Some(analyze_distribution(&sorted)),
        }
    }
}

/// Gap analysis over consecutive differences of sorted timestamps.
fn analyze_gaps(sorted: &[NaiveDateTime]) -> GapStats {
    let one_day = TimeDelta::days(1);
    let gaps: Vec<TimeDelta> = sorted
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .filter(|diff| *diff > one_day)
        .collect();

    let Some(max_gap) = gaps.iter().max() else {
        return GapStats::none();
    };

    let total_ms: i64 = gaps.iter().map(TimeDelta::num_milliseconds).sum();
    let mean_ms = total_ms / gaps.len() as i64;

    GapStats {
        count: gaps.len(),
        max_gap_days: max_gap.num_days(),
        avg_gap_days: Some(mean_ms.div_euclid(MILLIS_PER_DAY)),
    }
}

/// Hourly buckets if any value has a time of day, daily buckets otherwise.
fn analyze_distribution(sorted: &[NaiveDateTime]) -> Distribution {
    let has_time = sorted.iter().any(|ts| ts.hour() != 0 || ts.minute() != 0);

    if has_time {
        let mut hourly: IndexMap<u32, usize> = IndexMap::new();
        for ts in sorted {
            *hourly.entry(ts.hour()).or_insert(0) += 1;
        }
        hourly.sort_keys();
        Distribution::Hourly(hourly)
    } else {
        // Sorted input yields dates in ascending order
        let mut daily: IndexMap<String, usize> = IndexMap::new();
        for ts in sorted {
            *daily.entry(ts.date().format("%Y-%m-%d").to_string()).or_insert(0) += 1;
        }
        daily.truncate(MAX_DAILY_BUCKETS);
        Distribution::Daily(daily)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn test_range_and_gaps() {
        let stats = TemporalAnalyzer::new().analyze(&[
            date(2024, 1, 10),
            date(2024, 1, 1),
            date(2024, 1, 2),
            date(2024, 1, 4),
        ]);

        assert_eq!(stats.range.start.as_deref(), Some("2024-01-01T00:00:00"));
        assert_eq!(stats.range.end.as_deref(), Some("2024-01-10T00:00:00"));
        assert_eq!(stats.range.days, 9);

        // Diffs: 1 day (not a gap), 2 days, 6 days
        let gaps = stats.gaps.unwrap();
        assert_eq!(gaps.count, 2);
        assert_eq!(gaps.max_gap_days, 6);
        assert_eq!(gaps.avg_gap_days, Some(4));
    }

    #[test]
    fn test_no_gaps() {
        let stats = TemporalAnalyzer::new().analyze(&[date(2024, 1, 1), date(2024, 1, 2)]);
        assert_eq!(
            serde_json::to_value(stats.gaps.unwrap()).unwrap(),
            serde_json::json!({"count": 0, "max_gap_days": 0})
        );
    }

    #[test]
    fn test_daily_distribution() {
        let stats = TemporalAnalyzer::new().analyze(&[
            date(2024, 3, 2),
            date(2024, 3, 1),
            date(2024, 3, 2),
        ]);
        let json = serde_json::to_value(stats.distribution.unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "daily", "data": {"2024-03-01": 1, "2024-03-02": 2}})
        );
    }

    #[test]
    fn test_hourly_distribution() {
        let stats = TemporalAnalyzer::new().analyze(&[
            at(2024, 3, 1, 14, 0),
            at(2024, 3, 1, 9, 30),
            at(2024, 3, 2, 14, 15),
            date(2024, 3, 3),
        ]);
        let Some(Distribution::Hourly(hourly)) = stats.distribution else {
            panic!("expected hourly distribution");
        };
        let buckets: Vec<(u32, usize)> = hourly.into_iter().collect();
        assert_eq!(buckets, vec![(0, 1), (9, 1), (14, 2)]);
    }

    #[test]
    fn test_daily_buckets_are_capped() {
        let start = date(2020, 1, 1);
        let timestamps: Vec<NaiveDateTime> =
            (0..150).map(|d| start + TimeDelta::days(d)).collect();
        let stats = TemporalAnalyzer::new().analyze(&timestamps);

        let Some(Distribution::Daily(daily)) = stats.distribution else {
            panic!("expected daily distribution");
        };
        assert_eq!(daily.len(), MAX_DAILY_BUCKETS);
        assert_eq!(daily.keys().next().map(String::as_str), Some("2020-01-01"));
    }

    #[test]
    fn test_empty_sentinel() {
        let stats = TemporalAnalyzer::new().analyze(&[]);
        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            serde_json::json!({
                "range": {"start": null, "end": null, "days": 0},
                "gaps": null,
                "distribution": null
            })
        );
    }
}
