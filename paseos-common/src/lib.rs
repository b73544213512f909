//! # Paseos Common Library
//!
//! Shared code for the Paseos journey service including:
//! - Guidebook data model
//! - Error type
//! - Configuration loading
//! - Event types (PaseosEvent enum) and EventBus
//! - Notification relay wire types
//! - Guidebook store adapters (local SQLite, remote document store, memory)

pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod relay;
pub mod sse;
pub mod store;

pub use error::{Error, Result};
pub use model::{Destination, Guidebook};
