//! The DataCard report.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::analysis::{CategoricalStats, Correlations, NumericStats, TemporalStats};
use crate::anomaly::{Anomaly, Severity};
use crate::chart::ChartData;
use crate::sanitize::{Measure, Sanitize};

/// First and last parsable value of the first temporal field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTimeRange {
    pub start: String,
    pub end: String,
}

/// Dataset-level summary.
///
/// Only `record_count` is present for an empty dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub record_count: usize,
    /// Every field in the data, metadata fields included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_fields: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categorical_fields: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal_fields: Option<usize>,
    /// Sum of the first numeric field named `amount`, `notional` or `value`.
    /// The inner measure is cleared if the sum overflows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_notional: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<SummaryTimeRange>,
}

impl Summary {
    /// Summary of a dataset without records.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl Sanitize for Summary {
    fn sanitize(&mut self) {
        if let Some(total) = &mut self.total_notional {
            total.sanitize();
        }
    }
}

/// Complete statistical report for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataCard {
    pub summary: Summary,
    pub numeric_stats: IndexMap<String, NumericStats>,
    pub categorical_stats: IndexMap<String, CategoricalStats>,
    pub temporal_stats: IndexMap<String, TemporalStats>,
    pub correlations: Correlations,
    pub anomalies: Vec<Anomaly>,
    pub chart_data: Vec<ChartData>,
}

impl DataCard {
    /// Report for a dataset without records.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of anomalies at `severity`.
    pub fn anomaly_count(&self, severity: Severity) -> usize {
        self.anomalies.iter().filter(|a| a.severity == severity).count()
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

impl Sanitize for DataCard {
    fn sanitize(&mut self) {
        self.summary.sanitize();
        self.numeric_stats.sanitize();
        self.categorical_stats.sanitize();
        self.correlations.sanitize();
        self.anomalies.sanitize();
        self.chart_data.sanitize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_card_shape() {
        let json = serde_json::to_value(DataCard::empty()).unwrap();
        assert_eq!(
            json,
            json!({
                "summary": {"record_count": 0},
                "numeric_stats": {},
                "categorical_stats": {},
                "temporal_stats": {},
                "correlations": {},
                "anomalies": [],
                "chart_data": []
            })
        );
    }

    #[test]
    fn test_overflowing_notional_becomes_null() {
        let mut summary = Summary {
            record_count: 2,
            total_notional: Some(Some(f64::INFINITY)),
            ..Default::default()
        };
        summary.sanitize();

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json, json!({"record_count": 2, "total_notional": null}));
    }

    #[test]
    fn test_to_json_pretty() {
        let card = DataCard::empty();
        assert!(card.to_json(true).unwrap().contains('\n'));
        assert!(!card.to_json(false).unwrap().contains('\n'));
    }
}
