//! Per-field statistical analyzers.
//!
//! Each field of a schema is analyzed by the analyzer matching its kind:
//!
//! - [`NumericAnalyzer`]: descriptive statistics and outlier detection
//! - [`CategoricalAnalyzer`]: frequency ranking and concentration risk
//! - [`TemporalAnalyzer`]: range, gaps and time distribution
//!
//! [`CorrelationComputer`] works across numeric fields.

mod categorical;
mod correlation;
mod numeric;
mod temporal;

pub use categorical::{CategoricalAnalyzer, CategoricalStats, CategoryCount, MAX_RARE_CATEGORIES};
pub use correlation::{
    CorrelationComputer, CorrelationMatrix, Correlations, SignificantCorrelation, Strength,
};
pub use numeric::{
    Bounds, NumericAnalyzer, NumericStats, OutlierDetection, Outliers, MAX_REPORTED_OUTLIERS,
};
pub use temporal::{
    Distribution, GapStats, TemporalAnalyzer, TemporalStats, TimeRange, MAX_DAILY_BUCKETS,
};

pub(crate) use categorical::round_to;

use crate::input::Dataset;
use crate::options::AnalysisOptions;
use crate::schema::FieldKind;

/// Statistics produced for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldStats {
    Numeric(NumericStats),
    Categorical(CategoricalStats),
    Temporal(TemporalStats),
}

/// Analyzer for one field kind.
#[derive(Debug, Clone)]
pub enum FieldAnalyzer {
    Numeric(NumericAnalyzer),
    Categorical(CategoricalAnalyzer),
    Temporal(TemporalAnalyzer),
}

impl FieldAnalyzer {
    /// Build the analyzer for `kind` configured from `options`.
    pub fn for_kind(kind: FieldKind, options: &AnalysisOptions) -> Self {
        match kind {
            FieldKind::Numeric => FieldAnalyzer::Numeric(NumericAnalyzer::with_method(
                options.outlier_method,
                options.outlier_threshold,
            )),
            FieldKind::Categorical => {
                FieldAnalyzer::Categorical(CategoricalAnalyzer::with_top_n(options.top_n))
            }
            FieldKind::Temporal => FieldAnalyzer::Temporal(TemporalAnalyzer::new()),
        }
    }

    /// Field kind handled by this analyzer.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldAnalyzer::Numeric(_) => FieldKind::Numeric,
            FieldAnalyzer::Categorical(_) => FieldKind::Categorical,
            FieldAnalyzer::Temporal(_) => FieldKind::Temporal,
        }
    }

    /// Analyze one field of `dataset` through the projection matching this kind.
    pub fn analyze(&self, dataset: &Dataset, field: &str) -> FieldStats {
        match self {
            FieldAnalyzer::Numeric(analyzer) => {
                FieldStats::Numeric(analyzer.analyze(&dataset.numeric_column(field)))
            }
            FieldAnalyzer::Categorical(analyzer) => {
                FieldStats::Categorical(analyzer.analyze(&dataset.label_column(field)))
            }
            FieldAnalyzer::Temporal(analyzer) => {
                FieldStats::Temporal(analyzer.analyze(&dataset.temporal_column(field)))
            }
        }
    }
}
