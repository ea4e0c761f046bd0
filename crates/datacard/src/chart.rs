//! Chart-ready aggregates derived from field statistics.

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::analysis::{CategoricalStats, NumericStats};
use crate::input::Dataset;
use crate::sanitize::{Measure, Sanitize};

/// Number of equal-width histogram bins.
pub const HISTOGRAM_BINS: usize = 20;

/// Why a single field's chart could not be built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("no values to bin")]
    NoValues,

    #[error("value range [{min}, {max}] cannot be split into bins")]
    NonFiniteRange { min: f64, max: f64 },

    #[error("value range [{min}, {max}] is too narrow for finite-sized bins")]
    DegenerateRange { min: f64, max: f64 },
}

/// Histogram payload: bin edges, per-bin counts and the field's center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramData {
    /// `HISTOGRAM_BINS + 1` ascending edges.
    pub bins: Vec<Measure>,
    pub counts: Vec<usize>,
    pub mean: Measure,
    pub median: Measure,
}

/// Bar chart payload, parallel lists taken from the top-N ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarData {
    pub labels: Vec<String>,
    pub values: Vec<usize>,
    pub percentages: Vec<Measure>,
}

/// One chart in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartData {
    Histogram { field: String, data: HistogramData },
    Bar { field: String, data: BarData },
}

impl ChartData {
    /// Field the chart describes.
    pub fn field(&self) -> &str {
        match self {
            ChartData::Histogram { field, .. } | ChartData::Bar { field, .. } => field,
        }
    }
}

impl Sanitize for ChartData {
    fn sanitize(&mut self) {
        match self {
            ChartData::Histogram { data, .. } => {
                data.bins.sanitize();
                data.mean.sanitize();
                data.median.sanitize();
            }
            ChartData::Bar { data, .. } => data.percentages.sanitize(),
        }
    }
}

/// Equal-width histogram over finite values.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins spanning their range.
    ///
    /// A constant input is centered in a range of width 1. The last bin is
    /// closed on the right so the maximum is counted.
    pub fn compute(values: &[f64], bins: usize) -> Result<Self, ChartError> {
        let (min, max) = values
            .iter()
            .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .ok_or(ChartError::NoValues)?;

        let (first, last) = if min == max { (min - 0.5, max + 0.5) } else { (min, max) };
        let width = last - first;
        if !first.is_finite() || !last.is_finite() || !width.is_finite() || bins == 0 {
            return Err(ChartError::NonFiniteRange { min, max });
        }

        let step = width / bins as f64;
        let mut edges: Vec<f64> = (0..bins).map(|i| first + i as f64 * step).collect();
        edges.push(last);
        if edges.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ChartError::DegenerateRange { min, max });
        }

        let mut counts = vec![0usize; bins];
        for &v in values {
            let mut idx = (((v - first) / width) * bins as f64) as usize;
            idx = idx.min(bins - 1);
            // Floating point can land a value one bin off its edges
            if idx > 0 && v < edges[idx] {
                idx -= 1;
            } else if idx + 1 < bins && v >= edges[idx + 1] {
                idx += 1;
            }
            counts[idx] += 1;
        }

        Ok(Self { edges, counts })
    }
}

/// Builds histogram and bar chart payloads.
#[derive(Debug, Clone)]
pub struct ChartDataBuilder {
    bins: usize,
}

impl ChartDataBuilder {
    /// Create a builder using [`HISTOGRAM_BINS`] bins.
    pub fn new() -> Self {
        Self {
            bins: HISTOGRAM_BINS,
        }
    }

    /// Histograms for numeric fields by descending standard deviation, then
    /// bar charts for categorical fields by ascending unique count.
    pub fn build(
        &self,
        dataset: &Dataset,
        numeric_stats: &IndexMap<String, NumericStats>,
        categorical_stats: &IndexMap<String, CategoricalStats>,
    ) -> Vec<ChartData> {
        let mut charts = Vec::new();

        let mut numeric: Vec<(&String, &NumericStats)> = numeric_stats.iter().collect();
        numeric.sort_by(|a, b| descending_std(a.1.std, b.1.std));

        for (field, stats) in numeric {
            match self.histogram(dataset, field, stats) {
                Ok(chart) => charts.push(chart),
                Err(ChartError::NoValues) => {}
                Err(err) => warn!(field = %field, error = %err, "Skipping histogram"),
            }
        }

        let mut categorical: Vec<(&String, &CategoricalStats)> = categorical_stats.iter().collect();
        categorical.sort_by_key(|(_, stats)| stats.unique_count);

        for (field, stats) in categorical {
            if stats.top_n.is_empty() {
                continue;
            }
            charts.push(ChartData::Bar {
                field: field.clone(),
                data: BarData {
                    labels: stats.top_n.iter().map(|e| e.value.clone()).collect(),
                    values: stats.top_n.iter().map(|e| e.count).collect(),
                    percentages: stats.top_n.iter().map(|e| e.percent).collect(),
                },
            });
        }

        charts
    }

    /// Histogram chart for one numeric field.
    pub fn histogram(
        &self,
        dataset: &Dataset,
        field: &str,
        stats: &NumericStats,
    ) -> Result<ChartData, ChartError> {
        let values: Vec<f64> = dataset.numeric_column(field).into_iter().map(|(_, v)| v).collect();
        let histogram = Histogram::compute(&values, self.bins)?;

        Ok(ChartData::Histogram {
            field: field.to_string(),
            data: HistogramData {
                bins: histogram.edges.into_iter().map(Some).collect(),
                counts: histogram.counts,
                mean: stats.mean,
                median: stats.median,
            },
        })
    }
}

impl Default for ChartDataBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Larger standard deviation first; undefined deviations last.
fn descending_std(a: Measure, b: Measure) -> Ordering {
    let key = |m: Measure| m.filter(|v| !v.is_nan());
    match (key(a), key(b)) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{CategoricalAnalyzer, NumericAnalyzer};
    use serde_json::json;

    fn dataset(values: serde_json::Value) -> Dataset {
        let serde_json::Value::Array(items) = values else {
            panic!("expected array");
        };
        Dataset::from_json_records(items).unwrap()
    }

    fn numeric_stats(ds: &Dataset, fields: &[&str]) -> IndexMap<String, NumericStats> {
        fields
            .iter()
            .map(|f| (f.to_string(), NumericAnalyzer::new().analyze(&ds.numeric_column(f))))
            .collect()
    }

    fn categorical_stats(ds: &Dataset, fields: &[&str]) -> IndexMap<String, CategoricalStats> {
        fields
            .iter()
            .map(|f| (f.to_string(), CategoricalAnalyzer::new().analyze(&ds.label_column(f))))
            .collect()
    }

    #[test]
    fn test_histogram_edges_and_counts() {
        let values: Vec<f64> = (0..=20).map(f64::from).collect();
        let hist = Histogram::compute(&values, 20).unwrap();

        assert_eq!(hist.edges.len(), 21);
        assert_eq!(hist.edges[0], 0.0);
        assert_eq!(hist.edges[20], 20.0);
        assert_eq!(hist.counts.iter().sum::<usize>(), 21);
        // Maximum falls in the closed last bin
        assert_eq!(hist.counts[19], 2);
        assert_eq!(hist.counts[0], 1);
    }

    #[test]
    fn test_constant_values_span_unit_range() {
        let hist = Histogram::compute(&[5.0, 5.0, 5.0], 20).unwrap();
        assert_eq!(hist.edges[0], 4.5);
        assert_eq!(hist.edges[20], 5.5);
        assert_eq!(hist.counts.iter().sum::<usize>(), 3);
        assert_eq!(hist.counts[10], 3);
    }

    #[test]
    fn test_histogram_errors() {
        assert_eq!(Histogram::compute(&[], 20), Err(ChartError::NoValues));
        assert!(matches!(
            Histogram::compute(&[-f64::MAX, f64::MAX], 20),
            Err(ChartError::NonFiniteRange { .. })
        ));
    }

    #[test]
    fn test_histograms_ordered_by_std_descending() {
        let ds = dataset(json!([
            {"narrow": 1, "wide": 100, "mid": 10},
            {"narrow": 2, "wide": 300, "mid": 30},
            {"narrow": 3, "wide": 500, "mid": 50}
        ]));
        let stats = numeric_stats(&ds, &["narrow", "wide", "mid"]);
        let charts = ChartDataBuilder::new().build(&ds, &stats, &IndexMap::new());

        let order: Vec<&str> = charts.iter().map(ChartData::field).collect();
        assert_eq!(order, vec!["wide", "mid", "narrow"]);
    }

    #[test]
    fn test_failing_field_is_skipped() {
        let ds = dataset(json!([
            {"huge": -1.0e308, "ok": 1},
            {"huge": 1.0e308, "ok": 2}
        ]));
        let stats = numeric_stats(&ds, &["huge", "ok"]);
        let charts = ChartDataBuilder::new().build(&ds, &stats, &IndexMap::new());

        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].field(), "ok");
    }

    #[test]
    fn test_bar_charts_ordered_by_unique_count() {
        let ds = dataset(json!([
            {"many": "a", "few": "x", "empty": null},
            {"many": "b", "few": "x", "empty": null},
            {"many": "c", "few": "y", "empty": null}
        ]));
        let stats = categorical_stats(&ds, &["many", "few", "empty"]);
        let charts = ChartDataBuilder::new().build(&ds, &IndexMap::new(), &stats);

        let order: Vec<&str> = charts.iter().map(ChartData::field).collect();
        assert_eq!(order, vec!["few", "many"]);

        let json = serde_json::to_value(&charts[0]).unwrap();
        assert_eq!(
            json,
            json!({
                "type": "bar",
                "field": "few",
                "data": {"labels": ["x", "y"], "values": [2, 1], "percentages": [66.67, 33.33]}
            })
        );
    }

    #[test]
    fn test_histogram_payload_shape() {
        let ds = dataset(json!([{"x": 1}, {"x": 2}, {"x": 3}]));
        let stats = numeric_stats(&ds, &["x"]);
        let charts = ChartDataBuilder::new().build(&ds, &stats, &IndexMap::new());

        let json = serde_json::to_value(&charts[0]).unwrap();
        assert_eq!(json["type"], "histogram");
        assert_eq!(json["field"], "x");
        assert_eq!(json["data"]["bins"].as_array().unwrap().len(), 21);
        assert_eq!(json["data"]["counts"].as_array().unwrap().len(), 20);
        assert_eq!(json["data"]["mean"], 2.0);
        assert_eq!(json["data"]["median"], 2.0);
    }

    #[test]
    fn test_huge_constant_has_no_finite_bins() {
        assert_eq!(
            Histogram::compute(&[1e20, 1e20], HISTOGRAM_BINS),
            Err(ChartError::DegenerateRange { min: 1e20, max: 1e20 })
        );

        let ds = dataset(json!([{"big": 1e20, "x": 1}, {"big": 1e20, "x": 2}]));
        let stats = numeric_stats(&ds, &["big", "x"]);
        let charts = ChartDataBuilder::new().build(&ds, &stats, &IndexMap::new());

        let order: Vec<&str> = charts.iter().map(ChartData::field).collect();
        assert_eq!(order, vec!["x"]);
    }

    #[test]
    fn test_undefined_std_sorts_last() {
        assert_eq!(descending_std(Some(1.0), None), Ordering::Less);
        assert_eq!(descending_std(Some(f64::NAN), Some(0.0)), Ordering::Greater);
        assert_eq!(descending_std(Some(2.0), Some(1.0)), Ordering::Less);
    }
}
