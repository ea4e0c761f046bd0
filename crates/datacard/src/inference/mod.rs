//! Schema inference for record batches.

mod schema;

pub use schema::SchemaInference;
