//! Guidebook document endpoints
//!
//! Same shape as the remote document store, so a paseos server can back
//! another instance's `RemoteStore`.

use super::ApiError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use paseos_common::events::PaseosEvent;
use paseos_common::Guidebook;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct WriteResponse {
    pub id: String,
}

/// POST /api/guidebooks
pub async fn write_guidebook(
    State(state): State<AppState>,
    Json(guidebook): Json<Guidebook>,
) -> Result<(StatusCode, Json<WriteResponse>), ApiError> {
    let id = state.store.write(&guidebook).await?;
    info!("Wrote guidebook with id: {}", id);
    state.events.emit_lossy(PaseosEvent::GuidebookWritten {
        id: id.clone(),
        timestamp: chrono::Utc::now(),
    });
    Ok((StatusCode::CREATED, Json(WriteResponse { id })))
}

/// GET /api/guidebooks/:id
pub async fn read_guidebook(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Guidebook>, ApiError> {
    match state.store.read(&id).await? {
        Some(guidebook) => Ok(Json(guidebook.with_id(id))),
        None => Err(ApiError::NotFound(format!("journey {}", id))),
    }
}
