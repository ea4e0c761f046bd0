//! Pairwise Pearson correlation across numeric fields.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::input::Dataset;
use crate::sanitize::{Measure, Sanitize};

/// |r| above which a pair is reported as significant.
const SIGNIFICANT_R: f64 = 0.7;

/// |r| above which a significant pair is strong.
const STRONG_R: f64 = 0.9;

/// Strength label of a significant correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Moderate,
    Strong,
}

/// A field pair with |r| above the significance cutoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificantCorrelation {
    pub field1: String,
    pub field2: String,
    pub r: Measure,
    pub strength: Strength,
}

/// Upper-triangle Pearson coefficients keyed by `"field1_field2"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub pearson: IndexMap<String, Measure>,
    pub significant: Vec<SignificantCorrelation>,
}

impl Sanitize for CorrelationMatrix {
    fn sanitize(&mut self) {
        self.pearson.sanitize();
        for pair in &mut self.significant {
            pair.r.sanitize();
        }
    }
}

/// Correlation section of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Correlations {
    Pearson(CorrelationMatrix),
    /// Correlations were disabled or there were fewer than two numeric fields.
    NotComputed {},
}

impl Correlations {
    /// The computed matrix, if any.
    pub fn matrix(&self) -> Option<&CorrelationMatrix> {
        match self {
            Correlations::Pearson(matrix) => Some(matrix),
            Correlations::NotComputed {} => None,
        }
    }
}

impl Default for Correlations {
    fn default() -> Self {
        Correlations::NotComputed {}
    }
}

impl Sanitize for Correlations {
    fn sanitize(&mut self) {
        if let Correlations::Pearson(matrix) = self {
            matrix.sanitize();
        }
    }
}

/// Computes Pearson correlations for every unordered pair of numeric fields.
#[derive(Debug, Clone, Default)]
pub struct CorrelationComputer;

impl CorrelationComputer {
    pub fn new() -> Self {
        Self
    }

    /// Correlate `fields` over the records of `dataset`.
    ///
    /// Fields absent from the dataset are ignored. Each pair uses the records
    /// where both values are present. Pairs without a finite coefficient are
    /// skipped.
    pub fn compute(&self, dataset: &Dataset, fields: &[String]) -> CorrelationMatrix {
        let columns: Vec<(&str, Vec<Option<f64>>)> = fields
            .iter()
            .filter(|f| dataset.has_field(f))
            .map(|f| (f.as_str(), aligned_column(dataset, f)))
            .collect();

        let mut matrix = CorrelationMatrix::default();
        if columns.len() < 2 {
            return matrix;
        }

        for (i, (name1, col1)) in columns.iter().enumerate() {
            for (name2, col2) in columns.iter().skip(i + 1) {
                let r = pearson(col1, col2);
                if !r.is_finite() {
                    continue;
                }

                matrix.pearson.insert(format!("{}_{}", name1, name2), Some(r));

                if r.abs() > SIGNIFICANT_R {
                    matrix.significant.push(SignificantCorrelation {
                        field1: name1.to_string(),
                        field2: name2.to_string(),
                        r: Some(r),
                        strength: if r.abs() > STRONG_R {
                            Strength::Strong
                        } else {
                            Strength::Moderate
                        },
                    });
                }
            }
        }

        matrix
    }
}

/// Numeric view of a field, one slot per record.
fn aligned_column(dataset: &Dataset, field: &str) -> Vec<Option<f64>> {
    dataset.column(field).map(|(_, v)| v.as_number()).collect()
}

/// Pearson coefficient over pairwise-complete observations; NaN when undefined.
fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for &(x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let divisor = (sxx * syy).sqrt();
    if divisor == 0.0 {
        return f64::NAN;
    }
    (sxy / divisor).clamp(-1.0, 1.0)
}
