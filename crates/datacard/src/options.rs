//! Analysis options and request shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DataCardError, Result};
use crate::input::Dataset;
use crate::schema::FieldSchema;

/// Outlier detection method for numeric fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierMethod {
    /// Distance from the mean in population standard deviations.
    #[default]
    Zscore,
    /// Distance outside the interquartile fences.
    Iqr,
}

impl OutlierMethod {
    /// Wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutlierMethod::Zscore => "zscore",
            OutlierMethod::Iqr => "iqr",
        }
    }
}

impl fmt::Display for OutlierMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options controlling a single analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Compute pairwise Pearson correlations across numeric fields.
    pub compute_correlations: bool,
    /// Outlier detection method.
    pub outlier_method: OutlierMethod,
    /// Z-score cutoff or IQR multiplier, depending on the method.
    pub outlier_threshold: f64,
    /// Number of top categories reported per categorical field.
    pub top_n: usize,
    /// Emit chart-ready aggregates.
    pub include_distributions: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            compute_correlations: true,
            outlier_method: OutlierMethod::Zscore,
            outlier_threshold: 3.0,
            top_n: 10,
            include_distributions: true,
        }
    }
}

impl AnalysisOptions {
    /// Check that the options are usable.
    pub fn validate(&self) -> Result<()> {
        if !self.outlier_threshold.is_finite() || self.outlier_threshold < 0.0 {
            return Err(DataCardError::InvalidOptions(format!(
                "outlier_threshold must be a non-negative number, got {}",
                self.outlier_threshold
            )));
        }
        if self.top_n == 0 {
            return Err(DataCardError::InvalidOptions(
                "top_n must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// A complete analysis request: records, optional schema hints and options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Records to analyze.
    pub data: Dataset,
    /// Field classification hints (inferred when absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<FieldSchema>,
    /// Analysis options.
    #[serde(default)]
    pub options: AnalysisOptions,
}

impl AnalysisRequest {
    /// Create a request with default options and an inferred schema.
    pub fn new(data: Dataset) -> Self {
        Self {
            data,
            schema: None,
            options: AnalysisOptions::default(),
        }
    }

    /// Supply explicit schema hints.
    pub fn with_schema(mut self, schema: FieldSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Override the analysis options.
    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    /// Reject requests without records, with a malformed schema, or with
    /// unusable options.
    pub fn validate(&self) -> Result<()> {
        if self.data.is_empty() {
            return Err(DataCardError::EmptyData("Empty dataset provided".to_string()));
        }
        if let Some(schema) = &self.schema {
            schema.validate()?;
        }
        self.options.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options: AnalysisOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, AnalysisOptions::default());
        assert!(options.compute_correlations);
        assert_eq!(options.outlier_method, OutlierMethod::Zscore);
        assert_eq!(options.outlier_threshold, 3.0);
        assert_eq!(options.top_n, 10);
        assert!(options.include_distributions);
    }

    #[test]
    fn test_method_wire_names() {
        let options: AnalysisOptions =
            serde_json::from_str(r#"{"outlier_method": "iqr", "outlier_threshold": 1.5}"#).unwrap();
        assert_eq!(options.outlier_method, OutlierMethod::Iqr);
        assert!(serde_json::from_str::<AnalysisOptions>(r#"{"outlier_method": "mad"}"#).is_err());
    }

    #[test]
    fn test_validate() {
        let mut options = AnalysisOptions::default();
        assert!(options.validate().is_ok());

        options.outlier_threshold = -1.0;
        assert!(options.validate().is_err());

        options = AnalysisOptions { top_n: 0, ..Default::default() };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_request_validation() {
        let empty: AnalysisRequest = serde_json::from_str(r#"{"data": []}"#).unwrap();
        let err = empty.validate().unwrap_err();
        assert!(matches!(err, DataCardError::EmptyData(_)));
        assert!(err.is_validation());

        let crossed: AnalysisRequest = serde_json::from_str(
            r#"{"data": [{"a": 1}], "schema": {"numeric": ["a"], "categorical": ["a"]}}"#,
        )
        .unwrap();
        assert!(matches!(crossed.validate(), Err(DataCardError::InvalidSchema(_))));

        let ok: AnalysisRequest = serde_json::from_str(r#"{"data": [{"a": 1}]}"#).unwrap();
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_request_from_json() {
        let request: AnalysisRequest = serde_json::from_str(
            r#"{"data": [{"amount": 10}], "schema": {"numeric": ["amount"]}, "options": {"top_n": 3}}"#,
        )
        .unwrap();
        assert_eq!(request.data.len(), 1);
        assert_eq!(request.schema.unwrap().numeric, vec!["amount"]);
        assert_eq!(request.options.top_n, 3);
        assert!(request.options.compute_correlations);
    }
}
