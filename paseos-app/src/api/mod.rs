//! HTTP API handlers

pub mod clients;
pub mod guidebooks;
pub mod health;
pub mod notifications;

use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use tower_http::trace::TraceLayer;
use tracing::error;

/// Error returned by API handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Common(#[from] paseos_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use paseos_common::Error as E;

        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_)
            | ApiError::Common(E::InvalidInput(_))
            | ApiError::Common(E::EmptyJourney(_)) => StatusCode::BAD_REQUEST,
            ApiError::Common(E::Http(_)) | ApiError::Common(E::Store(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Common(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("API error: {}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// GET /events - SSE stream of PaseosEvents
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    paseos_common::sse::event_bus_sse_stream(&state.events, "paseos")
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/guidebooks",
            post(guidebooks::write_guidebook),
        )
        .route("/api/guidebooks/:id", get(guidebooks::read_guidebook))
        .route(
            "/api/notifications/interaction",
            post(notifications::notification_interaction),
        )
        .route("/api/clients/connect", get(clients::connect))
        .route("/api/clients/:id/navigate", post(clients::navigate))
        .route("/events", get(event_stream))
        .merge(health::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
