//! Schema types describing how each field is analyzed.

mod field;
mod types;

pub use field::FieldSchema;
pub use types::{is_metadata_field, FieldKind};
