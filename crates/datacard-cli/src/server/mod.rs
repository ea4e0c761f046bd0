//! HTTP surface for the analysis engine.

pub mod app;
pub mod error;
pub mod handlers;
pub mod state;
