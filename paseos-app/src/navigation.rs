//! URL path routing

use serde::Serialize;

/// Where a URL path leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Guidebook authoring (`/` and anything unrecognised)
    Authoring,
    /// `/journey/<id>`
    Journey { id: String },
}

impl Route {
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let mut segments = path.split('/');
        segments.next(); // leading empty segment
        match (segments.next(), segments.next()) {
            (Some("journey"), Some(id)) if !id.is_empty() => Route::Journey { id: id.to_string() },
            _ => Route::Authoring,
        }
    }
}

pub fn journey_path(id: &str) -> String {
    format!("/journey/{}", id)
}

/// Which page the shell is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivePage {
    GuideBook,
    DepartureView,
    JourneyView,
}
