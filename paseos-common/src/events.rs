//! Event types for the Paseos event system
//!
//! Provides the shared event definitions and the EventBus used to observe
//! journey lifecycle and relay activity (exposed over SSE at `/events`).

use crate::relay::NotificationAction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Paseos event types
///
/// Events are broadcast via EventBus and can be serialized for SSE transmission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PaseosEvent {
    /// Guidebook persisted by the store
    GuidebookWritten {
        id: String,
        timestamp: DateTime<Utc>,
    },

    /// Journey guidebook loaded for the departure view
    JourneyLoaded {
        id: String,
        /// False when the store had no document for `id`
        found: bool,
        timestamp: DateTime<Utc>,
    },

    /// Engagement started at position 0
    JourneyEngaged {
        id: String,
        destinations: usize,
        timestamp: DateTime<Utc>,
    },

    /// Presenter acted on a stop
    DestinationPresented {
        id: String,
        index: usize,
        end_marker: bool,
        timestamp: DateTime<Utc>,
    },

    /// Relay finished dispatching a notification interaction
    NotificationDispatched {
        tag: String,
        action: Option<NotificationAction>,
        /// Number of page instances whose journey id matched the tag
        matched: usize,
        timestamp: DateTime<Utc>,
    },

    /// Page instance registered with the relay
    ClientConnected {
        client_id: String,
        url: String,
        timestamp: DateTime<Utc>,
    },

    /// Page instance went away
    ClientDisconnected {
        client_id: String,
        timestamp: DateTime<Utc>,
    },
}

impl PaseosEvent {
    /// SSE event name
    pub fn event_type(&self) -> &'static str {
        match self {
            PaseosEvent::GuidebookWritten { .. } => "GuidebookWritten",
            PaseosEvent::JourneyLoaded { .. } => "JourneyLoaded",
            PaseosEvent::JourneyEngaged { .. } => "JourneyEngaged",
            PaseosEvent::DestinationPresented { .. } => "DestinationPresented",
            PaseosEvent::NotificationDispatched { .. } => "NotificationDispatched",
            PaseosEvent::ClientConnected { .. } => "ClientConnected",
            PaseosEvent::ClientDisconnected { .. } => "ClientDisconnected",
        }
    }
}

// ========================================
// EventBus Implementation
// ========================================

/// Central event distribution bus
///
/// Uses tokio::broadcast internally: publishing never blocks, slow
/// subscribers observe lag instead of stalling producers.
///
/// # Examples
///
/// ```
/// use paseos_common::events::{EventBus, PaseosEvent};
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(PaseosEvent::GuidebookWritten {
///     id: "1".to_string(),
///     timestamp: chrono::Utc::now(),
/// });
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<PaseosEvent>,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<PaseosEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)`, or `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: PaseosEvent,
    ) -> Result<usize, broadcast::error::SendError<PaseosEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring the no-subscriber case
    pub fn emit_lossy(&self, event: PaseosEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
