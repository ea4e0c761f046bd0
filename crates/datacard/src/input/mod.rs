//! Record batches, scalar values and dataset loading.

mod dataset;
pub mod datetime;
mod loader;
mod source;
mod value;

pub use dataset::{Dataset, DeclaredType, Record};
pub use datetime::{format_timestamp, parse_timestamp};
pub use loader::{is_null_value, Loader, LoaderConfig};
pub use source::SourceMetadata;
pub use value::Value;
