//! Fuzz target for the full DataCard pipeline.
//!
//! Builds records from structured fuzz input and checks that generation
//! never panics and leaves no non-finite measure behind.

#![no_main]

use arbitrary::Arbitrary;
use datacard::{
    AnalysisOptions, AnalysisRequest, DataCardGenerator, Dataset, OutlierMethod, Record, Value,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum FuzzValue {
    Number(f64),
    Text(String),
    Missing,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    records: Vec<Vec<(u8, FuzzValue)>>,
    iqr: bool,
    threshold: f64,
    top_n: u8,
    correlations: bool,
    distributions: bool,
}

fuzz_target!(|input: FuzzInput| {
    if input.records.len() > 500 {
        return;
    }

    let records: Vec<Record> = input
        .records
        .into_iter()
        .map(|fields| {
            fields
                .into_iter()
                .map(|(key, value)| {
                    let value = match value {
                        FuzzValue::Number(n) if n.is_finite() => Value::Number(n),
                        FuzzValue::Number(_) | FuzzValue::Missing => Value::Missing,
                        FuzzValue::Text(s) => Value::Text(s),
                    };
                    (format!("f{}", key % 6), value)
                })
                .collect()
        })
        .collect();

    let options = AnalysisOptions {
        compute_correlations: input.correlations,
        outlier_method: if input.iqr { OutlierMethod::Iqr } else { OutlierMethod::Zscore },
        outlier_threshold: input.threshold,
        top_n: input.top_n as usize,
        include_distributions: input.distributions,
    };

    let request = AnalysisRequest::new(Dataset::new(records)).with_options(options);
    if let Ok(card) = DataCardGenerator::new().generate(&request) {
        for stats in card.numeric_stats.values() {
            for measure in [
                stats.mean,
                stats.median,
                stats.std,
                stats.min,
                stats.max,
                stats.q25,
                stats.q75,
                stats.skewness,
                stats.kurtosis,
            ] {
                assert!(measure.is_none_or(f64::is_finite));
            }
        }
        for stats in card.categorical_stats.values() {
            assert!(stats.concentration_risk.is_none_or(f64::is_finite));
        }
        assert!(serde_json::to_string(&card).is_ok());
    }
});
