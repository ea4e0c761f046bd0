//! API request handlers.

mod analyze;
mod service;

pub use analyze::*;
pub use service::*;
