//! Guidebook data model
//!
//! A guidebook is a titled journey with an ordered list of destinations.
//! It is persisted as a whole document by a [`crate::store::GuidebookStore`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// One stop in a journey
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// External resource to open; empty means a textual stop only
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
}

impl Destination {
    pub fn new(url: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: description.into(),
        }
    }

    /// Whether this stop points at an external resource
    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// User-authored journey
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guidebook {
    /// Absent until first persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub destinations: Vec<Destination>,
}

impl Guidebook {
    /// Authoring default: one empty destination ready to be filled in
    pub fn blank() -> Self {
        Self {
            destinations: vec![Destination::default()],
            ..Self::default()
        }
    }

    /// Shown while a journey is loading or when its document is missing
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            title: "Loading...".to_string(),
            ..Self::default()
        }
    }

    /// Copy of this guidebook as a storable document (no id)
    pub fn as_document(&self) -> Self {
        Self {
            id: None,
            ..self.clone()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Check that this guidebook can be stepped through
    ///
    /// Engagement needs a correlation tag (the persisted id) and at least one
    /// real destination; an empty journey would collapse the first stop and
    /// the end marker onto the same position.
    pub fn ensure_engageable(&self) -> Result<&str> {
        let id = self
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                Error::InvalidInput("guidebook must be persisted before engagement".to_string())
            })?;
        if self.destinations.is_empty() {
            return Err(Error::EmptyJourney(id.to_string()));
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_has_one_empty_destination() {
        let guidebook = Guidebook::blank();
        assert!(guidebook.id.is_none());
        assert_eq!(guidebook.destinations, vec![Destination::default()]);
    }

    #[test]
    fn test_document_omits_id() {
        let guidebook = Guidebook::blank().with_id("42");
        let json = serde_json::to_value(guidebook.as_document()).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["destinations"][0]["url"], "");
    }

    #[test]
    fn test_deserialize_tolerates_missing_fields() {
        let guidebook: Guidebook =
            serde_json::from_str(r#"{"title":"Walk","destinations":[{"description":"Stop"}]}"#)
                .unwrap();
        assert_eq!(guidebook.title, "Walk");
        assert_eq!(guidebook.destinations[0].url, "");
        assert!(!guidebook.destinations[0].has_url());
    }

    #[test]
    fn test_whitespace_url_is_not_a_url() {
        assert!(!Destination::new("   ", "x").has_url());
        assert!(Destination::new("http://x", "x").has_url());
    }

    #[test]
    fn test_ensure_engageable() {
        let unsaved = Guidebook::blank();
        assert!(matches!(unsaved.ensure_engageable(), Err(Error::InvalidInput(_))));

        let empty = Guidebook::placeholder("abc");
        assert!(matches!(empty.ensure_engageable(), Err(Error::EmptyJourney(id)) if id == "abc"));

        let ready = Guidebook::blank().with_id("abc");
        assert_eq!(ready.ensure_engageable().unwrap(), "abc");
    }
}
