//! Dataset analysis handler.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use datacard::{AnalysisRequest, DataCard, DataCardError};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// POST /api/v1/analyze/dataset - Generate a DataCard for the posted records.
pub async fn analyze_dataset(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<DataCard>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    request.validate()?;

    tracing::debug!(records = request.data.len(), "analyzing dataset");

    let generator = state.generator.clone();
    let card = tokio::task::spawn_blocking(move || generator.generate(&request))
        .await
        .map_err(|e| DataCardError::Computation(format!("Analysis task failed: {}", e)))??;

    Ok(Json(card))
}
