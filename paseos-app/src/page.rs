//! Page-side engagement
//!
//! An [`EngagementView`] is the engaged journey carousel: a fresh sequencer
//! per engagement plus the shared presenter. A [`JourneyPage`] is where that
//! view is mounted and where relayed notification actions land.

use crate::host::ViewSurface;
use crate::presenter::{DestinationPresenter, Presentation};
use crate::relay::ClientCommand;
use crate::sequencer::{DestinationSequencer, Direction, Stop};
use paseos_common::events::{EventBus, PaseosEvent};
use paseos_common::relay::RelayMessage;
use paseos_common::{Destination, Guidebook, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

/// An engaged journey
pub struct EngagementView {
    tag: String,
    title: String,
    sequencer: DestinationSequencer,
    presenter: DestinationPresenter,
    events: EventBus,
}

impl EngagementView {
    /// Build a view for a persisted, non-empty guidebook
    pub fn new(
        guidebook: &Guidebook,
        presenter: DestinationPresenter,
        events: EventBus,
    ) -> Result<Self> {
        let tag = guidebook.ensure_engageable()?.to_string();
        Ok(Self {
            tag,
            title: guidebook.title.clone(),
            sequencer: DestinationSequencer::for_guidebook(guidebook)?,
            presenter,
            events,
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn sequencer(&self) -> &DestinationSequencer {
        &self.sequencer
    }

    /// Reset to the first destination and present it
    pub async fn start(&mut self) -> Presentation {
        self.sequencer.initialize();
        info!(
            "Engaging journey {} ({} destinations)",
            self.tag,
            self.sequencer.len()
        );
        self.events.emit_lossy(PaseosEvent::JourneyEngaged {
            id: self.tag.clone(),
            destinations: self.sequencer.len(),
            timestamp: chrono::Utc::now(),
        });
        self.pending().present().await
    }

    /// Move one step and present the new stop
    pub async fn step(&mut self, direction: Direction) -> Presentation {
        self.advance(direction).present().await
    }

    pub async fn next(&mut self) -> Presentation {
        self.step(Direction::Next).await
    }

    pub async fn previous(&mut self) -> Presentation {
        self.step(Direction::Previous).await
    }

    /// Move one step and capture the new stop without presenting it
    fn advance(&mut self, direction: Direction) -> PendingStop {
        let before = self.sequencer.position();
        self.sequencer.advance(direction);
        debug!(
            "Journey {}: {:?} {} -> {}",
            self.tag,
            direction,
            before,
            self.sequencer.position()
        );
        self.pending()
    }

    fn pending(&self) -> PendingStop {
        let stop = self.sequencer.current();
        PendingStop {
            tag: self.tag.clone(),
            title: self.title.clone(),
            index: stop.index,
            destination: stop.destination.cloned(),
            has_previous: self.sequencer.has_previous(),
            has_next: self.sequencer.has_next(),
            presenter: self.presenter.clone(),
            events: self.events.clone(),
        }
    }
}

/// Stop captured from a view, presented after the view is released
struct PendingStop {
    tag: String,
    title: String,
    index: usize,
    destination: Option<Destination>,
    has_previous: bool,
    has_next: bool,
    presenter: DestinationPresenter,
    events: EventBus,
}

impl PendingStop {
    async fn present(self) -> Presentation {
        let stop = Stop {
            index: self.index,
            destination: self.destination.as_ref(),
        };
        let presentation = self
            .presenter
            .present(
                &self.tag,
                &self.title,
                &stop,
                self.has_previous,
                self.has_next,
            )
            .await;
        self.events.emit_lossy(PaseosEvent::DestinationPresented {
            id: self.tag,
            index: presentation.index,
            end_marker: presentation.end_marker,
            timestamp: chrono::Utc::now(),
        });
        presentation
    }
}

/// Mount point for the engaged view of one page instance
///
/// The view is locked only to read or move its position. Presentation runs
/// after the lock is released, so host prompts never block unmounting.
pub struct JourneyPage {
    view: Mutex<Option<EngagementView>>,
    /// Keeps presentations in step order
    presenting: Mutex<()>,
    surface: Arc<dyn ViewSurface>,
}

impl JourneyPage {
    pub fn new(surface: Arc<dyn ViewSurface>) -> Self {
        Self {
            view: Mutex::new(None),
            presenting: Mutex::new(()),
            surface,
        }
    }

    /// Mount `view`, replacing (and discarding) any previous engagement
    pub async fn mount(&self, view: EngagementView) {
        *self.view.lock().await = Some(view);
    }

    /// Mount `view` and present its first stop
    pub async fn engage(&self, mut view: EngagementView) -> Presentation {
        let _presenting = self.presenting.lock().await;
        let presentation = view.start().await;
        self.mount(view).await;
        presentation
    }

    /// Drop the engaged view; its position is discarded
    pub async fn unmount(&self) -> bool {
        self.view.lock().await.take().is_some()
    }

    pub async fn is_mounted(&self) -> bool {
        self.view.lock().await.is_some()
    }

    /// Current `(position, has_previous, has_next)` of the mounted view
    pub async fn position(&self) -> Option<(usize, bool, bool)> {
        self.view.lock().await.as_ref().map(|view| {
            let seq = view.sequencer();
            (seq.position(), seq.has_previous(), seq.has_next())
        })
    }

    /// Step the mounted view from a UI gesture or relayed action
    pub async fn step(&self, direction: Direction) -> Option<Presentation> {
        let _presenting = self.presenting.lock().await;
        let pending = self.view.lock().await.as_mut()?.advance(direction);
        Some(pending.present().await)
    }

    /// Apply a relayed action; dropped when nothing is mounted
    pub async fn handle_relay_message(&self, message: RelayMessage) -> Option<Presentation> {
        let presentation = self.step(message.action.into()).await;
        if presentation.is_none() {
            debug!("Journey view not mounted; dropping {} message", message.action);
        }
        presentation
    }

    /// Apply one command from the relay
    pub async fn handle_command(&self, command: ClientCommand) -> Option<Presentation> {
        match command {
            ClientCommand::Focus => {
                self.surface.focus();
                None
            }
            ClientCommand::Deliver(message) => self.handle_relay_message(message).await,
        }
    }

    /// Consume relay commands until the registry drops this page
    pub async fn run(self: Arc<Self>, mut rx: mpsc::UnboundedReceiver<ClientCommand>) {
        while let Some(command) = rx.recv().await {
            self.handle_command(command).await;
        }
    }
}
