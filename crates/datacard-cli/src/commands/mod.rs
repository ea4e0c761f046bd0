//! CLI command implementations.

pub mod analyze;
pub mod schema;
pub mod serve;
