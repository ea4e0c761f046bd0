//! Outlier and concentration rules.

use indexmap::IndexMap;

use super::anomaly::{Anomaly, AnomalyDetails, AnomalyType, Severity};
use crate::analysis::{round_to, CategoricalStats, NumericStats};
use crate::options::OutlierMethod;

/// Share of all records above which an outlier anomaly is high severity.
const HIGH_OUTLIER_SHARE: f64 = 0.10;

/// HHI above which a categorical field is reported.
pub const CONCENTRATION_THRESHOLD: f64 = 0.25;

/// HHI above which a concentration anomaly is high severity.
pub const HIGH_CONCENTRATION_THRESHOLD: f64 = 0.5;

/// Derives anomalies from per-field statistics.
#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector;

impl AnomalyDetector {
    pub fn new() -> Self {
        Self
    }

    /// Run every rule. Outlier anomalies come first, then concentration
    /// anomalies, each in the order of the stats maps.
    pub fn detect(
        &self,
        numeric_stats: &IndexMap<String, NumericStats>,
        categorical_stats: &IndexMap<String, CategoricalStats>,
        record_count: usize,
    ) -> Vec<Anomaly> {
        let mut anomalies: Vec<Anomaly> = numeric_stats
            .iter()
            .filter_map(|(field, stats)| self.outlier_anomaly(field, stats, record_count))
            .collect();

        anomalies.extend(
            categorical_stats
                .iter()
                .filter_map(|(field, stats)| self.concentration_anomaly(field, stats)),
        );

        anomalies
    }

    fn outlier_anomaly(
        &self,
        field: &str,
        stats: &NumericStats,
        record_count: usize,
    ) -> Option<Anomaly> {
        let count = stats.outliers.count();
        if count == 0 {
            return None;
        }
        let method = stats.outliers.method().unwrap_or(OutlierMethod::Zscore);

        let total = record_count as f64;
        let severity = if count as f64 > total * HIGH_OUTLIER_SHARE {
            Severity::High
        } else {
            Severity::Medium
        };

        Some(Anomaly {
            anomaly_type: AnomalyType::StatisticalOutlier,
            field: field.to_string(),
            severity,
            description: format!(
                "{} outliers detected in {} using {} method",
                count, field, method
            ),
            affected_records: stats.outliers.indices().to_vec(),
            details: AnomalyDetails::Outlier {
                method,
                threshold: stats.outliers.threshold(),
                percent_of_total: Some(round_to(count as f64 / total * 100.0, 2)),
            },
        })
    }

    fn concentration_anomaly(&self, field: &str, stats: &CategoricalStats) -> Option<Anomaly> {
        let hhi = stats.concentration_risk.filter(|h| *h > CONCENTRATION_THRESHOLD)?;

        let severity = if hhi > HIGH_CONCENTRATION_THRESHOLD {
            Severity::High
        } else {
            Severity::Medium
        };
        let top = stats.top_entity();

        Some(Anomaly {
            anomaly_type: AnomalyType::ConcentrationRisk,
            field: field.to_string(),
            severity,
            description: format!("High concentration detected in {} (HHI: {:.3})", field, hhi),
            affected_records: Vec::new(),
            details: AnomalyDetails::Concentration {
                hhi: Some(hhi),
                top_entity: top.map(|t| t.value.clone()),
                top_entity_percent: top.map_or(Some(0.0), |t| t.percent),
            },
        })
    }
}
