//! Server-Sent Events (SSE) utilities
//!
//! Turns the EventBus into an SSE response for `/events`.

use crate::events::EventBus;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

/// Keep-alive interval for all Paseos SSE streams
pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Stream every PaseosEvent emitted after connection
///
/// Lagged subscribers skip the dropped events and keep streaming; the stream
/// ends when the bus is closed.
pub fn event_bus_sse_stream(
    bus: &EventBus,
    service_name: &'static str,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("New SSE client connected to {} events", service_name);
    let mut rx = bus.subscribe();

    let stream = async_stream::stream! {
        yield Ok(Event::default()
            .event("ConnectionStatus")
            .data("connected"));

        loop {
            match rx.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => {
                        debug!("SSE: Broadcasting {}", event.event_type());
                        yield Ok(Event::default().event(event.event_type()).data(json));
                    }
                    Err(e) => warn!("Failed to serialize event: {}", e),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("SSE subscriber lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(KEEP_ALIVE_INTERVAL)
            .text("heartbeat"),
    )
}
