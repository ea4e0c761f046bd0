//! DataCard: statistical reports for heterogeneous tabular records.
//!
//! A batch of records goes in, a [`DataCard`] comes out: per-field
//! statistics, cross-field correlations, flagged anomalies and chart-ready
//! aggregates.
//!
//! # Pipeline
//!
//! - **Schema**: fields are classified as numeric, categorical or temporal,
//!   either from caller hints or by inference
//! - **Analysis**: each field runs through the analyzer for its kind
//! - **Anomalies**: outlier and concentration rules run over the statistics
//! - **Charts**: histograms and bar charts are derived from the statistics
//! - **Sanitization**: non-finite results become `null` before the card is returned
//!
//! # Example
//!
//! ```no_run
//! use datacard::{AnalysisRequest, DataCardGenerator, Loader};
//!
//! let (dataset, _source) = Loader::new().load_file("trades.json").unwrap();
//! let card = DataCardGenerator::new()
//!     .generate(&AnalysisRequest::new(dataset))
//!     .unwrap();
//!
//! println!("Records: {}", card.summary.record_count);
//! println!("Anomalies: {}", card.anomalies.len());
//! ```

pub mod analysis;
pub mod anomaly;
pub mod chart;
pub mod error;
pub mod inference;
pub mod input;
pub mod sanitize;
pub mod schema;

mod card;
mod generator;
mod options;

pub use analysis::{
    CategoricalStats, CorrelationMatrix, Correlations, FieldStats, NumericStats, TemporalStats,
};
pub use anomaly::{Anomaly, AnomalyType, Severity};
pub use card::{DataCard, Summary, SummaryTimeRange};
pub use chart::{ChartData, ChartError};
pub use error::{DataCardError, Result};
pub use generator::DataCardGenerator;
pub use inference::SchemaInference;
pub use input::{Dataset, Loader, LoaderConfig, Record, SourceMetadata, Value};
pub use options::{AnalysisOptions, AnalysisRequest, OutlierMethod};
pub use sanitize::{Measure, Sanitize};
pub use schema::{FieldKind, FieldSchema};
