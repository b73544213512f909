//! Notification relay wire types
//!
//! Shared between the relay (which receives notification interactions) and
//! page instances (which receive relayed actions).

use serde::{Deserialize, Serialize};

/// Notification action identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationAction {
    Next,
    Previous,
}

impl NotificationAction {
    /// Wire identifier (`"next"` / `"previous"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationAction::Next => "next",
            NotificationAction::Previous => "previous",
        }
    }

    /// Button label shown on the notification
    pub fn title(&self) -> &'static str {
        match self {
            NotificationAction::Next => "Next",
            NotificationAction::Previous => "Previous",
        }
    }
}

impl std::fmt::Display for NotificationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page-bound message: `{ "action": "next" }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayMessage {
    pub action: NotificationAction,
}

/// User interaction with a raised notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationInteraction {
    /// Correlation tag (journey id)
    pub tag: String,
    /// `None` for a plain click on the notification body
    #[serde(default)]
    pub action: Option<NotificationAction>,
}

impl NotificationInteraction {
    pub fn click(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            action: None,
        }
    }

    pub fn action(tag: impl Into<String>, action: NotificationAction) -> Self {
        Self {
            tag: tag.into(),
            action: Some(action),
        }
    }
}

/// Extract the journey id from a page URL (`/journey/<id>/...`)
///
/// Accepts absolute URLs and bare paths. Returns the third `/`-separated
/// segment of the path, or `None` when it is absent or empty.
pub fn journey_id_from_url(url: &str) -> Option<String> {
    let path = match reqwest::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    // Segment stays percent-encoded, as the browser reports the page URL
    path.split('/')
        .nth(2)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let msg = RelayMessage {
            action: NotificationAction::Previous,
        };
        assert_eq!(serde_json::to_string(&msg).unwrap(), r#"{"action":"previous"}"#);

        let click: NotificationInteraction = serde_json::from_str(r#"{"tag":"abc"}"#).unwrap();
        assert_eq!(click, NotificationInteraction::click("abc"));
    }

    #[test]
    fn test_journey_id_from_absolute_url() {
        assert_eq!(
            journey_id_from_url("https://paseos.app/journey/abc").as_deref(),
            Some("abc")
        );
        assert_eq!(
            journey_id_from_url("http://localhost:5780/journey/42/extra?x=1").as_deref(),
            Some("42")
        );
    }

    #[test]
    fn test_journey_id_from_path() {
        assert_eq!(journey_id_from_url("/journey/xyz").as_deref(), Some("xyz"));
        assert_eq!(journey_id_from_url("/journey/xyz#top").as_deref(), Some("xyz"));
        assert_eq!(journey_id_from_url("/"), None);
        assert_eq!(journey_id_from_url("/journey/"), None);
    }

    #[test]
    fn test_journey_id_stays_percent_encoded() {
        assert_eq!(
            journey_id_from_url("http://localhost/journey/old%20town"),
            Some("old%20town".to_string())
        );
    }
}
