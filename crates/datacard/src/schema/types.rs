//! Field classification types.

use serde::{Deserialize, Serialize};

/// Analysis category assigned to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Continuous or discrete numbers.
    Numeric,
    /// Discrete labels.
    Categorical,
    /// Dates and timestamps.
    Temporal,
}

impl FieldKind {
    /// All kinds in report order.
    pub const ALL: [FieldKind; 3] = [FieldKind::Numeric, FieldKind::Categorical, FieldKind::Temporal];

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Numeric => "numeric",
            FieldKind::Categorical => "categorical",
            FieldKind::Temporal => "temporal",
        }
    }
}

/// Returns true for metadata fields, which are never analyzed.
pub fn is_metadata_field(name: &str) -> bool {
    name.starts_with('_')
}
