//! # Paseos journey engagement
//!
//! Steps a user through a guidebook's destinations and relays notification
//! actions back to the page that raised them:
//! - [`sequencer`]: position within an engaged journey
//! - [`presenter`]: window and notification side effects per stop
//! - [`relay`]: background notification relay and open-page registry
//! - [`page`]: page-side engagement view and relayed message handling
//! - [`app`]: application shell, commands and navigation
//! - [`api`]: HTTP surface (store, relay, SSE)

use paseos_common::events::EventBus;
use paseos_common::store::GuidebookStore;
use std::sync::Arc;

pub mod api;
pub mod app;
pub mod host;
pub mod navigation;
pub mod page;
pub mod presenter;
pub mod relay;
pub mod sequencer;

pub use api::build_router;

use relay::NotificationRelay;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GuidebookStore>,
    pub relay: Arc<NotificationRelay>,
    pub events: EventBus,
}

impl AppState {
    pub fn new(
        store: Arc<dyn GuidebookStore>,
        relay: Arc<NotificationRelay>,
        events: EventBus,
    ) -> Self {
        Self {
            store,
            relay,
            events,
        }
    }
}
