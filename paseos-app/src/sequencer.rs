//! Destination Sequencer
//!
//! Owns the ordered destinations of one engagement and the current position.
//! Positions `0..N-1` address real destinations; position `N` is the
//! synthetic end marker.

use paseos_common::relay::NotificationAction;
use paseos_common::{Destination, Error, Guidebook, Result};
use serde::{Deserialize, Serialize};

/// Description shown for the end marker
pub const END_OF_JOURNEY: &str = "end of journey";

/// Direction of travel through a journey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Previous,
}

impl From<NotificationAction> for Direction {
    fn from(action: NotificationAction) -> Self {
        match action {
            NotificationAction::Next => Direction::Next,
            NotificationAction::Previous => Direction::Previous,
        }
    }
}

/// The stop at the current position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stop<'a> {
    pub index: usize,
    /// `None` at the end marker
    pub destination: Option<&'a Destination>,
}

impl<'a> Stop<'a> {
    pub fn is_end_marker(&self) -> bool {
        self.destination.is_none()
    }

    /// URL to open; empty for textual stops and the end marker
    pub fn url(&self) -> &'a str {
        self.destination.map(|d| d.url.trim()).unwrap_or("")
    }

    pub fn has_url(&self) -> bool {
        self.destination.is_some_and(Destination::has_url)
    }

    pub fn description(&self) -> &'a str {
        self.destination
            .map(|d| d.description.as_str())
            .unwrap_or(END_OF_JOURNEY)
    }
}

/// Position tracker for one engagement
#[derive(Debug, Clone)]
pub struct DestinationSequencer {
    destinations: Vec<Destination>,
    position: usize,
}

impl DestinationSequencer {
    /// Start a sequence at position 0; an empty list is rejected
    pub fn new(destinations: Vec<Destination>) -> Result<Self> {
        if destinations.is_empty() {
            return Err(Error::EmptyJourney(
                "cannot sequence a journey without destinations".to_string(),
            ));
        }
        Ok(Self {
            destinations,
            position: 0,
        })
    }

    /// Sequence over a copy of the guidebook's destinations
    pub fn for_guidebook(guidebook: &Guidebook) -> Result<Self> {
        Self::new(guidebook.destinations.clone())
    }

    /// Reset to the first destination
    pub fn initialize(&mut self) {
        self.position = 0;
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of real destinations (the end marker sits at this position)
    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    pub fn is_at_end(&self) -> bool {
        self.position == self.len()
    }

    pub fn current(&self) -> Stop<'_> {
        Stop {
            index: self.position,
            destination: self.destinations.get(self.position),
        }
    }

    /// Move one step, clamped to `[0, N]`
    pub fn advance(&mut self, direction: Direction) -> Stop<'_> {
        match direction {
            Direction::Next if self.position < self.len() => self.position += 1,
            Direction::Previous if self.position > 0 => self.position -= 1,
            _ => {}
        }
        self.current()
    }

    pub fn has_previous(&self) -> bool {
        self.position > 0
    }

    /// True until the end marker itself is current
    pub fn has_next(&self) -> bool {
        self.position < self.len()
    }
}
