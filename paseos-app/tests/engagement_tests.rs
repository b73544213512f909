//! End-to-end engagement: authoring, navigation, engagement and relayed
//! notification actions driving the page's sequencer.

use paseos_app::app::{AppCommand, AppOutcome, PaseosApp};
use paseos_app::host::recording::RecordingHost;
use paseos_app::navigation::ActivePage;
use paseos_app::page::JourneyPage;
use paseos_app::presenter::{DestinationPresenter, NotificationOutcome};
use paseos_app::relay::{ClientRegistry, NotificationRelay};
use paseos_app::sequencer::{Direction, END_OF_JOURNEY};
use paseos_common::events::{EventBus, PaseosEvent};
use paseos_common::relay::{NotificationAction, NotificationInteraction};
use paseos_common::store::{GuidebookStore, LocalStore, MemoryStore};
use paseos_common::{Destination, Error, Guidebook, Result};
use std::sync::Arc;

fn two_stops() -> Guidebook {
    Guidebook {
        id: None,
        title: "Old town".to_string(),
        description: "A short walk".to_string(),
        destinations: vec![
            Destination::new("", "Stop A"),
            Destination::new("http://x", "Stop B"),
        ],
    }
}

struct Harness {
    host: Arc<RecordingHost>,
    app: PaseosApp,
    events: EventBus,
}

fn harness(store: Arc<dyn GuidebookStore>) -> Harness {
    let host = Arc::new(RecordingHost::new());
    let presenter = DestinationPresenter::new(host.clone(), host.clone(), host.clone());
    let page = Arc::new(JourneyPage::new(host.clone()));
    let events = EventBus::new(64);
    let app = PaseosApp::new(store, presenter, page, events.clone());
    Harness { host, app, events }
}

/// Store whose writes always fail
struct FailingStore;

#[async_trait::async_trait]
impl GuidebookStore for FailingStore {
    async fn write(&self, _guidebook: &Guidebook) -> Result<String> {
        Err(Error::Store("offline".to_string()))
    }

    async fn read(&self, _id: &str) -> Result<Option<Guidebook>> {
        Err(Error::Store("offline".to_string()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

#[tokio::test]
async fn test_two_stop_journey_scenario() {
    let mut h = harness(Arc::new(LocalStore::in_memory().await.unwrap()));

    // Write -> navigates to the journey's departure view
    let outcome = h.app.dispatch(AppCommand::WriteRequested(two_stops())).await;
    assert_eq!(
        outcome,
        AppOutcome::Navigated {
            path: "/journey/1".to_string()
        }
    );
    assert_eq!(h.app.active_page(), ActivePage::DepartureView);
    assert_eq!(h.app.guidebook().id.as_deref(), Some("1"));

    // Engage -> position 0, textual stop, unfocused so notified
    let loaded = h.app.guidebook().clone();
    let AppOutcome::Engaged { presentation } =
        h.app.dispatch(AppCommand::EngageRequested(loaded)).await
    else {
        panic!("expected engagement");
    };
    assert_eq!(presentation.index, 0);
    assert!(!presentation.opened_window);
    assert_eq!(h.app.active_page(), ActivePage::JourneyView);
    assert_eq!(h.app.page().position().await, Some((0, false, true)));
    assert_eq!(h.host.notifications()[0].body, "Stop A");
    assert_eq!(h.host.notifications()[0].action_ids(), vec!["next"]);

    // Next -> Stop B opens its URL
    let shown = h.app.page().step(Direction::Next).await.unwrap();
    assert_eq!(shown.index, 1);
    assert!(shown.opened_window);
    assert_eq!(
        h.host.windows(),
        vec![("http://x".to_string(), "1-destination".to_string())]
    );
    assert_eq!(h.app.page().position().await, Some((1, true, true)));

    // Next -> end marker
    let shown = h.app.page().step(Direction::Next).await.unwrap();
    assert!(shown.end_marker);
    assert_eq!(h.app.page().position().await, Some((2, true, false)));
    let last = h.host.notifications().pop().unwrap();
    assert_eq!(last.body, END_OF_JOURNEY);
    assert_eq!(last.action_ids(), vec!["previous"]);
}

#[tokio::test]
async fn test_relay_drives_mounted_page() {
    let mut h = harness(Arc::new(MemoryStore::new()));
    let outcome = h.app.dispatch(AppCommand::WriteRequested(two_stops())).await;
    let AppOutcome::Navigated { path } = outcome else {
        panic!("expected navigation");
    };
    let tag = h.app.guidebook().id.clone().unwrap();
    h.app
        .dispatch(AppCommand::EngageRequested(h.app.guidebook().clone()))
        .await;

    // Page instance registered with the relay at its journey URL
    let registry = Arc::new(ClientRegistry::new(h.events.clone()));
    let relay = NotificationRelay::new(registry.clone(), h.host.clone(), h.events.clone());
    let (_id, rx) = registry.register(format!("http://localhost{}", path), true).await;
    let page_task = tokio::spawn(h.app.page().clone().run(rx));

    let report = relay
        .handle(NotificationInteraction::action(&tag, NotificationAction::Next))
        .await;
    assert_eq!(report.messaged.len(), 1);

    let report = relay.handle(NotificationInteraction::click(&tag)).await;
    assert_eq!(report.focused.len(), 1);

    // Page runtime exits once the registry lets go of it
    drop(relay);
    drop(registry);
    page_task.await.unwrap();

    assert_eq!(h.app.page().position().await, Some((1, true, true)));
    assert_eq!(h.host.focus_calls(), 1);
    assert_eq!(h.host.closed(), vec![tag.clone(), tag]);
}

#[tokio::test]
async fn test_missing_journey_shows_placeholder() {
    let mut h = harness(Arc::new(MemoryStore::new()));
    let mut rx = h.events.subscribe();

    h.app.navigate("/journey/ghost").await;

    assert_eq!(h.app.active_page(), ActivePage::DepartureView);
    assert_eq!(h.app.guidebook().title, "Loading...");
    assert!(h.app.guidebook().destinations.is_empty());
    assert!(matches!(
        rx.try_recv().unwrap(),
        PaseosEvent::JourneyLoaded { found: false, .. }
    ));

    // placeholder cannot be engaged
    let outcome = h
        .app
        .dispatch(AppCommand::EngageRequested(h.app.guidebook().clone()))
        .await;
    assert!(matches!(outcome, AppOutcome::EngageRejected { .. }));
    assert!(!h.app.page().is_mounted().await);
}

#[tokio::test]
async fn test_failed_write_stays_on_current_page() {
    let mut h = harness(Arc::new(FailingStore));

    let outcome = h.app.dispatch(AppCommand::WriteRequested(two_stops())).await;

    assert!(matches!(outcome, AppOutcome::WriteFailed { .. }));
    assert_eq!(h.app.active_page(), ActivePage::GuideBook);
    assert_eq!(h.app.location(), "/");
    assert_eq!(h.app.guidebook().title, "Old town");
}

#[tokio::test]
async fn test_failed_read_shows_placeholder() {
    let mut h = harness(Arc::new(FailingStore));
    h.app.navigate("/journey/7").await;
    assert_eq!(h.app.guidebook(), &Guidebook::placeholder("7"));
}

#[tokio::test]
async fn test_edit_returns_to_authoring_and_unmounts() {
    let mut h = harness(Arc::new(MemoryStore::new()));
    h.app.dispatch(AppCommand::WriteRequested(two_stops())).await;
    h.app
        .dispatch(AppCommand::EngageRequested(h.app.guidebook().clone()))
        .await;
    assert!(h.app.page().is_mounted().await);

    let edited = h.app.guidebook().clone();
    let outcome = h.app.dispatch(AppCommand::EditRequested(edited)).await;

    assert_eq!(
        outcome,
        AppOutcome::Navigated {
            path: "/".to_string()
        }
    );
    assert_eq!(h.app.active_page(), ActivePage::GuideBook);
    assert_eq!(h.app.guidebook().title, "Old town");
    assert!(!h.app.page().is_mounted().await);
}

#[tokio::test]
async fn test_focused_page_suppresses_textual_notification() {
    let mut h = harness(Arc::new(MemoryStore::new()));
    h.host.set_focus(true);
    h.app.dispatch(AppCommand::WriteRequested(two_stops())).await;

    let AppOutcome::Engaged { presentation } = h
        .app
        .dispatch(AppCommand::EngageRequested(h.app.guidebook().clone()))
        .await
    else {
        panic!("expected engagement");
    };

    assert_eq!(presentation.notification, NotificationOutcome::SuppressedByFocus);
    assert!(h.host.notifications().is_empty());
}
