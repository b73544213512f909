//! Destination Presenter
//!
//! Decides the side effects for the current stop: open its URL in the
//! journey's destination window, and raise or suppress a notification.

use crate::host::{NotificationHost, NotificationRequest, Permission, ViewSurface, WindowHost};
use crate::sequencer::Stop;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// What happened to the notification for a presented stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationOutcome {
    Raised,
    /// Textual stop while the page already has focus
    SuppressedByFocus,
    /// Permission refused; silent no-op
    PermissionDenied,
    /// Host failed to show it (logged)
    Failed,
}

/// Record of one `present` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub index: usize,
    pub end_marker: bool,
    pub opened_window: bool,
    pub notification: NotificationOutcome,
}

/// Window key for a journey's destinations
pub fn window_target(tag: &str) -> String {
    format!("{}-destination", tag)
}

/// Acts on stops through host capabilities
///
/// Holds no window handle across calls; the destination window is
/// re-resolved by key on every presentation.
#[derive(Clone)]
pub struct DestinationPresenter {
    windows: Arc<dyn WindowHost>,
    notifications: Arc<dyn NotificationHost>,
    surface: Arc<dyn ViewSurface>,
}

impl DestinationPresenter {
    pub fn new(
        windows: Arc<dyn WindowHost>,
        notifications: Arc<dyn NotificationHost>,
        surface: Arc<dyn ViewSurface>,
    ) -> Self {
        Self {
            windows,
            notifications,
            surface,
        }
    }

    /// Present `stop` of journey `tag`
    pub async fn present(
        &self,
        tag: &str,
        title: &str,
        stop: &Stop<'_>,
        has_previous: bool,
        has_next: bool,
    ) -> Presentation {
        let mut opened_window = false;

        if stop.has_url() {
            let target = window_target(tag);
            match self.windows.open_and_focus(stop.url(), &target) {
                Ok(()) => opened_window = true,
                Err(e) => warn!("Failed to open {} in {}: {}", stop.url(), target, e),
            }
        } else if self.surface.has_focus() {
            debug!("Window has focus. Skip notification for stop {}", stop.index);
            return Presentation {
                index: stop.index,
                end_marker: stop.is_end_marker(),
                opened_window,
                notification: NotificationOutcome::SuppressedByFocus,
            };
        }

        let request =
            NotificationRequest::new(tag, title, stop.description(), has_previous, has_next);
        let notification = self.notify(request).await;

        Presentation {
            index: stop.index,
            end_marker: stop.is_end_marker(),
            opened_window,
            notification,
        }
    }

    /// Raise a notification once permission is granted
    pub async fn notify(&self, request: NotificationRequest) -> NotificationOutcome {
        match self.notifications.request_permission().await {
            Permission::Granted => {}
            other => {
                debug!("Notification permission {:?}; not notifying", other);
                return NotificationOutcome::PermissionDenied;
            }
        }

        let tag = request.tag.clone();
        match self.notifications.show(request).await {
            Ok(()) => NotificationOutcome::Raised,
            Err(e) => {
                warn!("Failed to show notification for {}: {}", tag, e);
                NotificationOutcome::Failed
            }
        }
    }
}
