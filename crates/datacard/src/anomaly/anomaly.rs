//! Anomaly records.

use serde::{Deserialize, Serialize};

use crate::options::OutlierMethod;
use crate::sanitize::{Measure, Sanitize};

/// Kind of anomaly detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    /// A numeric field has values flagged by the outlier scan.
    StatisticalOutlier,
    /// A categorical field is dominated by few values.
    ConcentrationRisk,
}

impl AnomalyType {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            AnomalyType::StatisticalOutlier => "Statistical Outlier",
            AnomalyType::ConcentrationRisk => "Concentration Risk",
        }
    }
}

/// Severity level of an anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth reviewing.
    Medium,
    /// Likely to distort downstream analysis.
    High,
}

impl Severity {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

/// Structured details, shaped by the anomaly type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnomalyDetails {
    Outlier {
        method: OutlierMethod,
        threshold: Measure,
        /// Flagged values as a percentage of all records, rounded to 2 decimals.
        percent_of_total: Measure,
    },
    Concentration {
        hhi: Measure,
        /// Most frequent value, if the field has any.
        top_entity: Option<String>,
        top_entity_percent: Measure,
    },
}

impl Sanitize for AnomalyDetails {
    fn sanitize(&mut self) {
        match self {
            AnomalyDetails::Outlier {
                threshold,
                percent_of_total,
                ..
            } => {
                threshold.sanitize();
                percent_of_total.sanitize();
            }
            AnomalyDetails::Concentration {
                hhi,
                top_entity_percent,
                ..
            } => {
                hhi.sanitize();
                top_entity_percent.sanitize();
            }
        }
    }
}

/// A detected anomaly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    /// Kind of anomaly.
    #[serde(rename = "type")]
    pub anomaly_type: AnomalyType,
    /// Affected field.
    pub field: String,
    pub severity: Severity,
    /// Human-readable description.
    pub description: String,
    /// Record indices involved, at most 100.
    pub affected_records: Vec<usize>,
    pub details: AnomalyDetails,
}

impl Sanitize for Anomaly {
    fn sanitize(&mut self) {
        self.details.sanitize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let anomaly = Anomaly {
            anomaly_type: AnomalyType::ConcentrationRisk,
            field: "counterparty".to_string(),
            severity: Severity::High,
            description: "High concentration detected in counterparty (HHI: 0.820)".to_string(),
            affected_records: Vec::new(),
            details: AnomalyDetails::Concentration {
                hhi: Some(0.82),
                top_entity: Some("A".to_string()),
                top_entity_percent: Some(90.0),
            },
        };

        let json = serde_json::to_value(&anomaly).unwrap();
        assert_eq!(json["type"], "concentration_risk");
        assert_eq!(json["severity"], "high");
        assert_eq!(json["details"]["top_entity"], "A");

        let back: Anomaly = serde_json::from_value(json).unwrap();
        assert_eq!(back, anomaly);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::High > Severity::Medium);
        assert_eq!(Severity::Medium.label(), "Medium");
    }
}
