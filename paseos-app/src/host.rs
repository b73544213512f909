//! Host environment capabilities
//!
//! Windows, focus and the notification system belong to the host. The
//! presenter, relay and pages receive them as trait objects.

use async_trait::async_trait;
use paseos_common::relay::NotificationAction;
use paseos_common::Result;
use serde::{Deserialize, Serialize};

/// Icon attached to every journey notification
pub const NOTIFICATION_ICON: &str = "/images/paseos-icon.png";

/// Opens destination windows
pub trait WindowHost: Send + Sync {
    /// Open `url` in the window keyed by `target` and focus it
    ///
    /// Reusing a key re-focuses the existing window instead of opening another.
    fn open_and_focus(&self, url: &str, target: &str) -> Result<()>;
}

/// The primary viewing surface of a page
pub trait ViewSurface: Send + Sync {
    /// Whether the surface currently holds input focus
    fn has_focus(&self) -> bool;

    /// Bring the surface to the foreground
    fn focus(&self);
}

/// Result of a notification permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
    Default,
}

/// Raises system notifications
#[async_trait]
pub trait NotificationHost: Send + Sync {
    async fn request_permission(&self) -> Permission;

    async fn show(&self, request: NotificationRequest) -> Result<()>;
}

/// Notification tray as seen from the relay
#[async_trait]
pub trait NotificationTray: Send + Sync {
    /// Clear the notification carrying `tag`
    async fn close(&self, tag: &str);
}

/// Action button on a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationButton {
    pub action: NotificationAction,
    pub title: String,
}

impl From<NotificationAction> for NotificationButton {
    fn from(action: NotificationAction) -> Self {
        Self {
            action,
            title: action.title().to_string(),
        }
    }
}

/// Everything needed to raise one journey notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub title: String,
    /// Correlation tag; a new notification with the same tag replaces the old one
    pub tag: String,
    pub body: String,
    pub icon: String,
    pub renotify: bool,
    pub require_interaction: bool,
    pub actions: Vec<NotificationButton>,
}

impl NotificationRequest {
    /// Build a request offering "Previous" then "Next" as available
    pub fn new(
        tag: &str,
        title: &str,
        body: &str,
        has_previous: bool,
        has_next: bool,
    ) -> Self {
        let actions = [
            (has_previous, NotificationAction::Previous),
            (has_next, NotificationAction::Next),
        ]
        .into_iter()
        .filter(|(offered, _)| *offered)
        .map(|(_, action)| NotificationButton::from(action))
        .collect();

        Self {
            title: title.to_string(),
            tag: tag.to_string(),
            body: body.to_string(),
            icon: NOTIFICATION_ICON.to_string(),
            renotify: true,
            require_interaction: true,
            actions,
        }
    }

    pub fn action_ids(&self) -> Vec<&'static str> {
        self.actions.iter().map(|b| b.action.as_str()).collect()
    }
}


pub mod recording {
    //! Host that records every call instead of touching a display
    //!
    //! Backs headless runs and the test suites.

    use super::*;
    use paseos_common::Error;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Recording implementation of every host capability
    pub struct RecordingHost {
        focused: AtomicBool,
        fail_windows: AtomicBool,
        fail_notifications: AtomicBool,
        permission: Mutex<Permission>,
        permission_requests: AtomicUsize,
        focus_calls: AtomicUsize,
        windows: Mutex<Vec<(String, String)>>,
        notifications: Mutex<Vec<NotificationRequest>>,
        closed: Mutex<Vec<String>>,
    }

    impl Default for RecordingHost {
        fn default() -> Self {
            Self {
                focused: AtomicBool::new(false),
                fail_windows: AtomicBool::new(false),
                fail_notifications: AtomicBool::new(false),
                permission: Mutex::new(Permission::Granted),
                permission_requests: AtomicUsize::new(0),
                focus_calls: AtomicUsize::new(0),
                windows: Mutex::new(Vec::new()),
                notifications: Mutex::new(Vec::new()),
                closed: Mutex::new(Vec::new()),
            }
        }
    }

    impl RecordingHost {
        /// Unfocused surface, notification permission granted
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_focus(&self, focused: bool) {
            self.focused.store(focused, Ordering::SeqCst);
        }

        /// Make `open_and_focus` fail without recording the window
        pub fn set_window_failure(&self, fail: bool) {
            self.fail_windows.store(fail, Ordering::SeqCst);
        }

        /// Make `show` fail without recording the notification
        pub fn set_show_failure(&self, fail: bool) {
            self.fail_notifications.store(fail, Ordering::SeqCst);
        }

        pub fn set_permission(&self, permission: Permission) {
            *self.permission.lock().unwrap_or_else(|e| e.into_inner()) = permission;
        }

        /// `(url, target)` pairs passed to `open_and_focus`
        pub fn windows(&self) -> Vec<(String, String)> {
            self.windows.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }

        /// Every request passed to `show`, oldest first
        pub fn notifications(&self) -> Vec<NotificationRequest> {
            self.notifications
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone()
        }

        /// Tags passed to `NotificationTray::close`
        pub fn closed(&self) -> Vec<String> {
            self.closed.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }

        pub fn focus_calls(&self) -> usize {
            self.focus_calls.load(Ordering::SeqCst)
        }

        pub fn permission_requests(&self) -> usize {
            self.permission_requests.load(Ordering::SeqCst)
        }
    }

    impl WindowHost for RecordingHost {
        fn open_and_focus(&self, url: &str, target: &str) -> Result<()> {
            if self.fail_windows.load(Ordering::SeqCst) {
                return Err(Error::Host(format!("window {} blocked", target)));
            }
            self.windows
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push((url.to_string(), target.to_string()));
            Ok(())
        }
    }

    impl ViewSurface for RecordingHost {
        fn has_focus(&self) -> bool {
            self.focused.load(Ordering::SeqCst)
        }

        fn focus(&self) {
            self.focus_calls.fetch_add(1, Ordering::SeqCst);
            self.focused.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl NotificationHost for RecordingHost {
        async fn request_permission(&self) -> Permission {
            self.permission_requests.fetch_add(1, Ordering::SeqCst);
            *self.permission.lock().unwrap_or_else(|e| e.into_inner())
        }

        async fn show(&self, request: NotificationRequest) -> Result<()> {
            if self.fail_notifications.load(Ordering::SeqCst) {
                return Err(Error::Host(format!(
                    "notification {} rejected",
                    request.tag
                )));
            }
            self.notifications
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(request);
            Ok(())
        }
    }

    #[async_trait]
    impl NotificationTray for RecordingHost {
        async fn close(&self, tag: &str) {
            self.closed
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(tag.to_string());
        }
    }
}

/// Tray for a relay whose notifications live in a remote browser
///
/// The browser clears its own tray before reporting the interaction, so
/// closing is only recorded in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingTray;

#[async_trait]
impl NotificationTray for LoggingTray {
    async fn close(&self, tag: &str) {
        tracing::debug!("Notification {} cleared by the browser", tag);
    }
}
