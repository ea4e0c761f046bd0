//! DataCard generation pipeline.

use indexmap::IndexMap;
use tracing::{debug, instrument};

use crate::analysis::{
    CategoricalStats, CorrelationComputer, Correlations, FieldAnalyzer, FieldStats, NumericStats,
    TemporalStats,
};
use crate::anomaly::AnomalyDetector;
use crate::card::{DataCard, Summary, SummaryTimeRange};
use crate::chart::ChartDataBuilder;
use crate::error::Result;
use crate::inference::SchemaInference;
use crate::input::{format_timestamp, Dataset};
use crate::options::{AnalysisOptions, AnalysisRequest};
use crate::sanitize::Sanitize;
use crate::schema::{FieldKind, FieldSchema};

/// Field names summed into `total_notional`, in priority order.
const NOTIONAL_FIELDS: [&str; 3] = ["amount", "notional", "value"];

/// Turns a dataset into a [`DataCard`].
///
/// Generation is synchronous and keeps no state between calls, so one
/// generator can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct DataCardGenerator {
    options: AnalysisOptions,
    inference: SchemaInference,
    correlations: CorrelationComputer,
    anomalies: AnomalyDetector,
    charts: ChartDataBuilder,
}

impl DataCardGenerator {
    /// Create a generator with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator whose [`DataCardGenerator::analyze`] uses `options`.
    pub fn with_options(options: AnalysisOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Options used by [`DataCardGenerator::analyze`].
    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Generate a report for a request, using its schema and options.
    pub fn generate(&self, request: &AnalysisRequest) -> Result<DataCard> {
        self.run(&request.data, request.schema.as_ref(), &request.options)
    }

    /// Generate a report with an inferred schema and this generator's options.
    pub fn analyze(&self, dataset: &Dataset) -> Result<DataCard> {
        self.run(dataset, None, &self.options)
    }

    #[instrument(skip_all, fields(records = dataset.len(), schema_supplied = schema.is_some()))]
    fn run(
        &self,
        dataset: &Dataset,
        schema: Option<&FieldSchema>,
        options: &AnalysisOptions,
    ) -> Result<DataCard> {
        options.validate()?;
        if let Some(schema) = schema {
            schema.validate()?;
        }

        if dataset.is_empty() || dataset.field_names().is_empty() {
            debug!("No records to analyze, returning empty card");
            return Ok(DataCard::empty());
        }

        let schema = match schema {
            Some(schema) => schema.clone(),
            None => self.inference.infer(dataset),
        };
        debug!(
            numeric = schema.numeric.len(),
            categorical = schema.categorical.len(),
            temporal = schema.temporal.len(),
            "Resolved schema"
        );

        let summary = self.summarize(dataset, &schema);

        let mut numeric_stats: IndexMap<String, NumericStats> = IndexMap::new();
        let mut categorical_stats: IndexMap<String, CategoricalStats> = IndexMap::new();
        let mut temporal_stats: IndexMap<String, TemporalStats> = IndexMap::new();

        for kind in FieldKind::ALL {
            let analyzer = FieldAnalyzer::for_kind(kind, options);
            for field in schema.fields(kind) {
                // Hints for fields the data does not carry are ignored
                if !dataset.has_field(field) {
                    debug!(field = %field, kind = kind.label(), "Skipping absent field");
                    continue;
                }
                match analyzer.analyze(dataset, field) {
                    FieldStats::Numeric(stats) => {
                        numeric_stats.insert(field.clone(), stats);
                    }
                    FieldStats::Categorical(stats) => {
                        categorical_stats.insert(field.clone(), stats);
                    }
                    FieldStats::Temporal(stats) => {
                        temporal_stats.insert(field.clone(), stats);
                    }
                }
            }
        }

        let correlations = if options.compute_correlations && schema.numeric.len() >= 2 {
            Correlations::Pearson(self.correlations.compute(dataset, &schema.numeric))
        } else {
            Correlations::NotComputed {}
        };

        let anomalies = self
            .anomalies
            .detect(&numeric_stats, &categorical_stats, dataset.len());
        debug!(count = anomalies.len(), "Detected anomalies");

        let chart_data = if options.include_distributions {
            self.charts.build(dataset, &numeric_stats, &categorical_stats)
        } else {
            Vec::new()
        };

        let mut card = DataCard {
            summary,
            numeric_stats,
            categorical_stats,
            temporal_stats,
            correlations,
            anomalies,
            chart_data,
        };
        card.sanitize();
        Ok(card)
    }

    fn summarize(&self, dataset: &Dataset, schema: &FieldSchema) -> Summary {
        let total_notional = NOTIONAL_FIELDS
            .iter()
            .find(|name| dataset.has_field(name) && schema.numeric.iter().any(|f| f == *name))
            .map(|name| Some(dataset.numeric_column(name).iter().map(|(_, v)| v).sum::<f64>()));

        let time_range = schema
            .temporal
            .first()
            .filter(|field| dataset.has_field(field))
            .and_then(|field| {
                let timestamps = dataset.temporal_column(field);
                let start = timestamps.iter().min()?;
                let end = timestamps.iter().max()?;
                Some(SummaryTimeRange {
                    start: format_timestamp(start),
                    end: format_timestamp(end),
                })
            });

        Summary {
            record_count: dataset.len(),
            field_count: Some(dataset.field_names().len()),
            numeric_fields: Some(schema.numeric.len()),
            categorical_fields: Some(schema.categorical.len()),
            temporal_fields: Some(schema.temporal.len()),
            total_notional,
            time_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataCardError;
    use crate::options::OutlierMethod;
    use serde_json::json;

    fn request(value: serde_json::Value) -> AnalysisRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_amount_example() {
        let card = DataCardGenerator::new()
            .generate(&request(json!({"data": [{"amount": 10}, {"amount": 20}, {"amount": 30}]})))
            .unwrap();

        let stats = &card.numeric_stats["amount"];
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, Some(20.0));
        assert_eq!(stats.std, Some(10.0));
        assert_eq!(card.summary.total_notional, Some(Some(60.0)));
        assert_eq!(card.summary.field_count, Some(1));
        assert_eq!(card.summary.numeric_fields, Some(1));
        // One numeric field: nothing to correlate
        assert_eq!(card.correlations, Correlations::NotComputed {});
        assert_eq!(card.chart_data.len(), 1);
    }

    #[test]
    fn test_empty_dataset_short_circuits() {
        let card = DataCardGenerator::new().analyze(&Dataset::default()).unwrap();
        assert_eq!(card, DataCard::empty());

        let no_fields = request(json!({"data": [{}, {}]}));
        let card = DataCardGenerator::new().generate(&no_fields).unwrap();
        assert_eq!(card.summary.record_count, 0);
    }

    #[test]
    fn test_validation_runs_before_analysis() {
        let bad_schema = request(json!({
            "data": [{"a": 1}],
            "schema": {"numeric": ["a"], "temporal": ["a"]}
        }));
        let err = DataCardGenerator::new().generate(&bad_schema).unwrap_err();
        assert!(matches!(err, DataCardError::InvalidSchema(_)));

        let bad_options = request(json!({"data": [], "options": {"top_n": 0}}));
        let err = DataCardGenerator::new().generate(&bad_options).unwrap_err();
        assert!(matches!(err, DataCardError::InvalidOptions(_)));
    }

    #[test]
    fn test_schema_override_skips_absent_fields() {
        let card = DataCardGenerator::new()
            .generate(&request(json!({
                "data": [{"a": 1, "b": "x"}, {"a": 2, "b": "y"}],
                "schema": {"numeric": ["a", "ghost"], "categorical": ["b"]}
            })))
            .unwrap();

        assert_eq!(card.numeric_stats.keys().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(card.summary.numeric_fields, Some(2));
        // Pair count follows the schema list, the absent field drops out
        assert_eq!(card.correlations.matrix().map(|m| m.pearson.len()), Some(0));
    }

    #[test]
    fn test_options_disable_sections() {
        let card = DataCardGenerator::new()
            .generate(&request(json!({
                "data": [{"x": 1, "y": 2}, {"x": 2, "y": 4}, {"x": 3, "y": 7}],
                "options": {"compute_correlations": false, "include_distributions": false}
            })))
            .unwrap();
        assert_eq!(card.correlations, Correlations::NotComputed {});
        assert!(card.chart_data.is_empty());
    }

    #[test]
    fn test_analyze_uses_generator_options() {
        let options = AnalysisOptions {
            outlier_method: OutlierMethod::Iqr,
            outlier_threshold: 1.5,
            ..Default::default()
        };
        let generator = DataCardGenerator::with_options(options);
        let ds: Dataset = serde_json::from_value(json!([
            {"v": 1}, {"v": 2}, {"v": 3}, {"v": 4}, {"v": 5}, {"v": 100}
        ]))
        .unwrap();

        let card = generator.analyze(&ds).unwrap();
        assert_eq!(card.numeric_stats["v"].outliers.method(), Some(OutlierMethod::Iqr));
        assert_eq!(card.anomalies.len(), 1);
        assert_eq!(card.anomalies[0].affected_records, vec![5]);
    }

    #[test]
    fn test_summary_time_range_and_metadata_fields() {
        let card = DataCardGenerator::new()
            .generate(&request(json!({
                "data": [
                    {"ts": "2024-02-01", "_id": "a"},
                    {"ts": "2024-01-15", "_id": "b"},
                    {"ts": null, "_id": "c"}
                ]
            })))
            .unwrap();

        assert_eq!(card.summary.field_count, Some(2));
        assert_eq!(card.summary.temporal_fields, Some(1));
        assert_eq!(card.summary.categorical_fields, Some(0));
        assert_eq!(
            card.summary.time_range,
            Some(SummaryTimeRange {
                start: "2024-01-15T00:00:00".to_string(),
                end: "2024-02-01T00:00:00".to_string(),
            })
        );
    }

    #[test]
    fn test_single_value_is_sanitized() {
        let card = DataCardGenerator::new()
            .generate(&request(json!({"data": [{"amount": 5}]})))
            .unwrap();
        let json = serde_json::to_value(&card).unwrap();
        assert!(json["numeric_stats"]["amount"]["std"].is_null());
        assert!(json["numeric_stats"]["amount"]["skewness"].is_null());
        assert_eq!(json["numeric_stats"]["amount"]["mean"], 5.0);
    }
}
