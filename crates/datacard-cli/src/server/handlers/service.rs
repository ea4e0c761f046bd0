//! Service health and discovery handlers.

use axum::Json;
use indexmap::IndexMap;
use serde::Serialize;

const SERVICE_NAME: &str = "analysis-service";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: IndexMap<&'static str, &'static str>,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
    })
}

/// GET / - Describe the service and its endpoints.
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        endpoints: IndexMap::from([
            ("health", "/health"),
            ("analyze", "/api/v1/analyze/dataset"),
        ]),
    })
}
