//! Field classification for schema inference.

use crate::input::{Dataset, DeclaredType, Value};
use crate::schema::{is_metadata_field, FieldKind, FieldSchema};

/// Number of leading non-missing values sampled for date detection.
const TEMPORAL_SAMPLE_SIZE: usize = 10;

/// Classifies every non-metadata field as numeric, categorical or temporal.
#[derive(Debug, Clone)]
pub struct SchemaInference {
    /// Non-missing values sampled when probing untyped fields for dates.
    temporal_sample_size: usize,
}

impl SchemaInference {
    /// Create a new schema inference with default settings.
    pub fn new() -> Self {
        Self {
            temporal_sample_size: TEMPORAL_SAMPLE_SIZE,
        }
    }

    /// Infer the field schema of a dataset.
    ///
    /// Fields are visited in first-seen order; names starting with an
    /// underscore are skipped.
    pub fn infer(&self, dataset: &Dataset) -> FieldSchema {
        let mut schema = FieldSchema::new();

        for name in dataset.field_names() {
            if is_metadata_field(name) {
                continue;
            }
            schema.push(self.classify(dataset, name), name);
        }

        schema
    }

    /// Classify one field.
    pub fn classify(&self, dataset: &Dataset, name: &str) -> FieldKind {
        match dataset.declared_type(name) {
            DeclaredType::Timestamp => FieldKind::Temporal,
            DeclaredType::Numeric => FieldKind::Numeric,
            DeclaredType::Untyped if self.sample_is_temporal(dataset, name) => FieldKind::Temporal,
            DeclaredType::Untyped => FieldKind::Categorical,
        }
    }

    /// Check whether the leading non-missing values all parse as dates.
    fn sample_is_temporal(&self, dataset: &Dataset, name: &str) -> bool {
        let sample: Vec<&Value> = dataset
            .present(name)
            .take(self.temporal_sample_size)
            .map(|(_, v)| v)
            .collect();

        !sample.is_empty() && sample.iter().all(|v| v.as_timestamp().is_some())
    }
}

impl Default for SchemaInference {
    fn default() -> Self {
        Self::new()
    }
}
