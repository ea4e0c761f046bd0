//! Field schema: the partition of fields into analysis categories.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{DataCardError, Result};
use super::types::FieldKind;

/// Classification of fields into numeric, categorical and temporal lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(default)]
    pub numeric: Vec<String>,
    #[serde(default)]
    pub categorical: Vec<String>,
    #[serde(default)]
    pub temporal: Vec<String>,
}

impl FieldSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field to the list for `kind`.
    pub fn push(&mut self, kind: FieldKind, name: impl Into<String>) {
        self.fields_mut(kind).push(name.into());
    }

    /// Builder form of [`FieldSchema::push`].
    pub fn with(mut self, kind: FieldKind, name: impl Into<String>) -> Self {
        self.push(kind, name);
        self
    }

    /// Fields of one category, in declaration order.
    pub fn fields(&self, kind: FieldKind) -> &[String] {
        match kind {
            FieldKind::Numeric => &self.numeric,
            FieldKind::Categorical => &self.categorical,
            FieldKind::Temporal => &self.temporal,
        }
    }

    fn fields_mut(&mut self, kind: FieldKind) -> &mut Vec<String> {
        match kind {
            FieldKind::Numeric => &mut self.numeric,
            FieldKind::Categorical => &mut self.categorical,
            FieldKind::Temporal => &mut self.temporal,
        }
    }

    /// Category of a field, if classified.
    pub fn kind_of(&self, name: &str) -> Option<FieldKind> {
        FieldKind::ALL
            .into_iter()
            .find(|&kind| self.fields(kind).iter().any(|f| f == name))
    }

    /// Total number of classified fields.
    pub fn len(&self) -> usize {
        self.numeric.len() + self.categorical.len() + self.temporal.len()
    }

    /// Returns true if no field is classified.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that every field appears in exactly one category, once.
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashMap<&str, FieldKind> = HashMap::new();

        for kind in FieldKind::ALL {
            for name in self.fields(kind) {
                if name.trim().is_empty() {
                    return Err(DataCardError::InvalidSchema(format!(
                        "empty field name in {} list",
                        kind.label()
                    )));
                }
                if let Some(previous) = seen.insert(name.as_str(), kind) {
                    return Err(DataCardError::InvalidSchema(if previous == kind {
                        format!("field '{}' listed twice as {}", name, kind.label())
                    } else {
                        format!(
                            "field '{}' listed as both {} and {}",
                            name,
                            previous.label(),
                            kind.label()
                        )
                    }));
                }
            }
        }

        Ok(())
    }
}
