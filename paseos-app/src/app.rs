//! Application shell
//!
//! Replaces UI event bubbling with an explicit [`AppCommand`] enum handled by
//! [`PaseosApp::dispatch`], and maps URL changes onto the active page via
//! [`PaseosApp::navigate`].

use crate::navigation::{journey_path, ActivePage, Route};
use crate::page::{EngagementView, JourneyPage};
use crate::presenter::{DestinationPresenter, Presentation};
use paseos_common::events::{EventBus, PaseosEvent};
use paseos_common::store::GuidebookStore;
use paseos_common::Guidebook;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Commands raised by the authoring and departure views
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Return to authoring with this guidebook
    EditRequested(Guidebook),
    /// Start stepping through this guidebook
    EngageRequested(Guidebook),
    /// Persist this guidebook and open its journey page
    WriteRequested(Guidebook),
}

/// Result of dispatching an [`AppCommand`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AppOutcome {
    Navigated { path: String },
    /// Write rejected by the store; the current page stays active
    WriteFailed { reason: String },
    Engaged { presentation: Presentation },
    EngageRejected { reason: String },
}

/// Application shell state for one page instance
pub struct PaseosApp {
    store: Arc<dyn GuidebookStore>,
    presenter: DestinationPresenter,
    page: Arc<JourneyPage>,
    events: EventBus,
    active_page: ActivePage,
    guidebook: Guidebook,
    location: String,
}

impl PaseosApp {
    pub fn new(
        store: Arc<dyn GuidebookStore>,
        presenter: DestinationPresenter,
        page: Arc<JourneyPage>,
        events: EventBus,
    ) -> Self {
        Self {
            store,
            presenter,
            page,
            events,
            active_page: ActivePage::GuideBook,
            guidebook: Guidebook::blank(),
            location: "/".to_string(),
        }
    }

    pub fn active_page(&self) -> ActivePage {
        self.active_page
    }

    pub fn guidebook(&self) -> &Guidebook {
        &self.guidebook
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn page(&self) -> &Arc<JourneyPage> {
        &self.page
    }

    /// Router callback: run on initial load and on every URL change
    pub async fn navigate(&mut self, path: &str) {
        self.location = path.to_string();
        if self.active_page == ActivePage::JourneyView {
            self.page.unmount().await;
        }

        match Route::from_path(path) {
            Route::Journey { id } => {
                self.active_page = ActivePage::DepartureView;
                self.guidebook = Guidebook::placeholder(id.clone());
                self.guidebook = self.load(&id).await;
            }
            Route::Authoring => {
                self.active_page = ActivePage::GuideBook;
            }
        }
    }

    async fn load(&self, id: &str) -> Guidebook {
        let (guidebook, found) = match self.store.read(id).await {
            Ok(Some(guidebook)) => (guidebook.with_id(id), true),
            Ok(None) => {
                warn!("No such journey: {}", id);
                (Guidebook::placeholder(id), false)
            }
            Err(e) => {
                error!("Error reading journey {}: {}", id, e);
                (Guidebook::placeholder(id), false)
            }
        };
        self.events.emit_lossy(PaseosEvent::JourneyLoaded {
            id: id.to_string(),
            found,
            timestamp: chrono::Utc::now(),
        });
        guidebook
    }

    pub async fn dispatch(&mut self, command: AppCommand) -> AppOutcome {
        match command {
            AppCommand::WriteRequested(guidebook) => self.write(guidebook).await,
            AppCommand::EditRequested(guidebook) => {
                info!("Editing guidebook");
                self.guidebook = guidebook;
                self.navigate("/").await;
                AppOutcome::Navigated {
                    path: "/".to_string(),
                }
            }
            AppCommand::EngageRequested(guidebook) => self.engage(guidebook).await,
        }
    }

    async fn write(&mut self, guidebook: Guidebook) -> AppOutcome {
        match self.store.write(&guidebook).await {
            Ok(id) => {
                info!("Wrote guidebook with id: {}", id);
                self.events.emit_lossy(PaseosEvent::GuidebookWritten {
                    id: id.clone(),
                    timestamp: chrono::Utc::now(),
                });
                let path = journey_path(&id);
                self.navigate(&path).await;
                AppOutcome::Navigated { path }
            }
            Err(e) => {
                error!("Error writing guidebook: {}", e);
                self.guidebook = guidebook;
                AppOutcome::WriteFailed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn engage(&mut self, guidebook: Guidebook) -> AppOutcome {
        let view = match EngagementView::new(&guidebook, self.presenter.clone(), self.events.clone())
        {
            Ok(view) => view,
            Err(e) => {
                warn!("Refusing to engage journey: {}", e);
                return AppOutcome::EngageRejected {
                    reason: e.to_string(),
                };
            }
        };

        self.guidebook = guidebook;
        self.active_page = ActivePage::JourneyView;
        let presentation = self.page.engage(view).await;
        AppOutcome::Engaged { presentation }
    }
}
