//! Application state for the web server.

use std::sync::Arc;

use datacard::DataCardGenerator;

/// Shared application state.
#[derive(Clone, Default)]
pub struct AppState {
    /// Generator shared by all requests; options travel with each request.
    pub generator: Arc<DataCardGenerator>,
}

impl AppState {
    /// Create new application state.
    pub fn new() -> Self {
        Self::default()
    }
}
