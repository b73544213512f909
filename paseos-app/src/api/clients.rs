//! Open page registration
//!
//! A browser page connects to `/api/clients/connect` and receives relay
//! commands as SSE events: `Registered` once, then `Focus` and `Message`.

use super::ApiError;
use crate::relay::{ClientCommand, ClientId, ClientRegistry};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::Stream;
use paseos_common::sse::KEEP_ALIVE_INTERVAL;
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct ConnectParams {
    /// Current URL of the page
    pub url: String,
    #[serde(default)]
    pub controlled: bool,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub url: String,
}

/// Unregisters the page when its SSE stream is dropped
struct Registration {
    registry: Arc<ClientRegistry>,
    id: ClientId,
}

impl Drop for Registration {
    fn drop(&mut self) {
        let registry = self.registry.clone();
        let id = self.id;
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                registry.unregister(id).await;
            });
        }
    }
}

fn command_event(command: ClientCommand) -> Option<Event> {
    match command {
        ClientCommand::Focus => Some(Event::default().event("Focus").data("{}")),
        ClientCommand::Deliver(message) => match serde_json::to_string(&message) {
            Ok(json) => Some(Event::default().event("Message").data(json)),
            Err(e) => {
                warn!("Failed to serialize relay message: {}", e);
                None
            }
        },
    }
}

/// GET /api/clients/connect?url=...&controlled=...
pub async fn connect(
    State(state): State<AppState>,
    Query(params): Query<ConnectParams>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let registry = state.relay.registry().clone();
    let (id, mut rx) = registry.register(params.url.clone(), params.controlled).await;
    info!("Page {} connected at {}", id, params.url);

    let stream = async_stream::stream! {
        let _registration = Registration { registry, id };

        yield Ok(Event::default()
            .event("Registered")
            .data(json!({ "client_id": id }).to_string()));

        while let Some(command) = rx.recv().await {
            if let Some(event) = command_event(command) {
                yield Ok(event);
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL))
}

/// POST /api/clients/:id/navigate
pub async fn navigate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<NavigateRequest>,
) -> Result<StatusCode, ApiError> {
    let id: ClientId = id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid client id: {}", id)))?;

    if state.relay.registry().navigate(id, request.url).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("client {}", id)))
    }
}
