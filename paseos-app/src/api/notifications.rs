//! Notification interaction endpoint
//!
//! The browser's service worker reports notification clicks here; the relay
//! forwards them to the matching open pages.

use crate::relay::DispatchReport;
use crate::AppState;
use axum::{extract::State, Json};
use paseos_common::relay::NotificationInteraction;

/// POST /api/notifications/interaction
///
/// Responds once dispatch to every open page has completed.
pub async fn notification_interaction(
    State(state): State<AppState>,
    Json(interaction): Json<NotificationInteraction>,
) -> Json<DispatchReport> {
    Json(state.relay.handle(interaction).await)
}
