//! Notification Relay
//!
//! Runs independently of any page. On a notification interaction it clears
//! the notification, enumerates every open page instance, and for pages
//! whose URL carries the notification's journey id either focuses the page
//! (plain click) or hands it the action as a [`RelayMessage`].

use crate::host::NotificationTray;
use futures::future::join_all;
use paseos_common::events::{EventBus, PaseosEvent};
use paseos_common::relay::{journey_id_from_url, NotificationInteraction, RelayMessage};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Identity of one open page instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::str::FromStr for ClientId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Command delivered from the relay to a page instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClientCommand {
    /// Bring the page to the foreground
    Focus,
    /// Relayed notification action
    Deliver(RelayMessage),
}

struct RegisteredClient {
    url: String,
    controlled: bool,
    tx: mpsc::UnboundedSender<ClientCommand>,
}

/// Snapshot of an open page instance
#[derive(Debug, Clone)]
pub struct ClientHandle {
    pub id: ClientId,
    pub url: String,
    pub controlled: bool,
    tx: mpsc::UnboundedSender<ClientCommand>,
}

impl ClientHandle {
    /// Queue a command for the page; false once the page has gone away
    pub fn send(&self, command: ClientCommand) -> bool {
        self.tx.send(command).is_ok()
    }
}

/// Open page instances of this application
pub struct ClientRegistry {
    clients: RwLock<HashMap<ClientId, RegisteredClient>>,
    events: EventBus,
}

impl ClientRegistry {
    pub fn new(events: EventBus) -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
            events,
        }
    }

    /// Register a page at `url`; commands arrive on the returned receiver
    pub async fn register(
        &self,
        url: impl Into<String>,
        controlled: bool,
    ) -> (ClientId, mpsc::UnboundedReceiver<ClientCommand>) {
        let id = ClientId::new();
        let url = url.into();
        let (tx, rx) = mpsc::unbounded_channel();

        debug!("Client {} registered at {}", id, url);
        self.clients.write().await.insert(
            id,
            RegisteredClient {
                url: url.clone(),
                controlled,
                tx,
            },
        );
        self.events.emit_lossy(PaseosEvent::ClientConnected {
            client_id: id.to_string(),
            url,
            timestamp: chrono::Utc::now(),
        });

        (id, rx)
    }

    /// Record that a page moved to another URL; false if unknown
    pub async fn navigate(&self, id: ClientId, url: impl Into<String>) -> bool {
        match self.clients.write().await.get_mut(&id) {
            Some(client) => {
                client.url = url.into();
                true
            }
            None => false,
        }
    }

    pub async fn unregister(&self, id: ClientId) -> bool {
        let removed = self.clients.write().await.remove(&id).is_some();
        if removed {
            debug!("Client {} unregistered", id);
            self.events.emit_lossy(PaseosEvent::ClientDisconnected {
                client_id: id.to_string(),
                timestamp: chrono::Utc::now(),
            });
        }
        removed
    }

    /// Enumerate open pages, pruning any whose receiver has been dropped
    pub async fn match_all(&self, include_uncontrolled: bool) -> Vec<ClientHandle> {
        let mut clients = self.clients.write().await;

        let closed: Vec<ClientId> = clients
            .iter()
            .filter(|(_, c)| c.tx.is_closed())
            .map(|(id, _)| *id)
            .collect();
        for id in closed {
            warn!("Pruning closed client {}", id);
            clients.remove(&id);
            self.events.emit_lossy(PaseosEvent::ClientDisconnected {
                client_id: id.to_string(),
                timestamp: chrono::Utc::now(),
            });
        }

        clients
            .iter()
            .filter(|(_, c)| include_uncontrolled || c.controlled)
            .map(|(id, c)| ClientHandle {
                id: *id,
                url: c.url.clone(),
                controlled: c.controlled,
                tx: c.tx.clone(),
            })
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.clients.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.clients.read().await.is_empty()
    }
}

/// Relay lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayState {
    Idle,
    Dispatching,
}

/// Outcome of one dispatch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub tag: String,
    /// Pages brought to focus (plain click)
    pub focused: Vec<ClientId>,
    /// Pages that were sent the action
    pub messaged: Vec<ClientId>,
}

impl DispatchReport {
    pub fn matched(&self) -> usize {
        self.focused.len() + self.messaged.len()
    }
}

enum Delivery {
    Focused(ClientId),
    Messaged(ClientId),
}

/// Background relay for notification interactions
pub struct NotificationRelay {
    registry: Arc<ClientRegistry>,
    tray: Arc<dyn NotificationTray>,
    events: EventBus,
    state: Mutex<RelayState>,
}

impl NotificationRelay {
    pub fn new(
        registry: Arc<ClientRegistry>,
        tray: Arc<dyn NotificationTray>,
        events: EventBus,
    ) -> Self {
        Self {
            registry,
            tray,
            events,
            state: Mutex::new(RelayState::Idle),
        }
    }

    pub fn registry(&self) -> &Arc<ClientRegistry> {
        &self.registry
    }

    /// Current state; `Dispatching` while a dispatch holds the relay
    pub fn state(&self) -> RelayState {
        match self.state.try_lock() {
            Ok(state) => *state,
            Err(_) => RelayState::Dispatching,
        }
    }

    /// Dispatch one interaction and wait for all of its work to finish
    ///
    /// Dispatches are serialised, so actions reach a page in the order the
    /// user triggered them. Per-page delivery within one dispatch runs
    /// concurrently and in no particular order.
    pub async fn handle(&self, interaction: NotificationInteraction) -> DispatchReport {
        let mut state = self.state.lock().await;
        *state = RelayState::Dispatching;

        self.tray.close(&interaction.tag).await;

        let clients = self.registry.match_all(true).await;
        let deliveries = clients
            .into_iter()
            .map(|client| Self::deliver(client, &interaction));
        let outcomes = join_all(deliveries).await;

        let mut report = DispatchReport {
            tag: interaction.tag.clone(),
            ..DispatchReport::default()
        };
        for outcome in outcomes.into_iter().flatten() {
            match outcome {
                Delivery::Focused(id) => report.focused.push(id),
                Delivery::Messaged(id) => report.messaged.push(id),
            }
        }

        if report.matched() == 0 {
            debug!("No open page for journey {}", interaction.tag);
        } else {
            info!(
                "Relayed {} for journey {} to {} page(s)",
                interaction.action.map(|a| a.as_str()).unwrap_or("click"),
                interaction.tag,
                report.matched()
            );
        }
        self.events.emit_lossy(PaseosEvent::NotificationDispatched {
            tag: interaction.tag.clone(),
            action: interaction.action,
            matched: report.matched(),
            timestamp: chrono::Utc::now(),
        });

        *state = RelayState::Idle;
        report
    }

    async fn deliver(client: ClientHandle, interaction: &NotificationInteraction) -> Option<Delivery> {
        let journey_id = journey_id_from_url(&client.url)?;
        if journey_id != interaction.tag {
            return None;
        }

        let (command, delivery) = match interaction.action {
            None => (ClientCommand::Focus, Delivery::Focused(client.id)),
            Some(action) => (
                ClientCommand::Deliver(RelayMessage { action }),
                Delivery::Messaged(client.id),
            ),
        };

        if client.send(command) {
            Some(delivery)
        } else {
            warn!("Client {} went away before delivery", client.id);
            None
        }
    }

    /// Run the relay as a background task fed by `rx`
    pub fn spawn(self: Arc<Self>, mut rx: mpsc::Receiver<NotificationInteraction>) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("Notification relay started");
            while let Some(interaction) = rx.recv().await {
                self.handle(interaction).await;
            }
            info!("Notification relay stopped");
        })
    }
}
