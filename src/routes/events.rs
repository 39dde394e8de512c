// SPDX-License-Identifier: MIT

//! Saved-event routes and the public event submission endpoint.

use axum::{
    extract::State,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::db::collections;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Event, EventSubmission, RawEvent, SavedEvent, StoredSubmission};
use crate::routes::api::EventSummary;
use crate::time_utils::now_rfc3339;
use crate::AppState;

/// Public event routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/events/create", post(create_event))
}

/// Saved-event routes (require authentication).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/events/saved", get(get_saved_events))
        .route("/api/events/save", post(save_event))
        .route("/api/events/delete", delete(delete_saved_event))
}

// ─── Saved Events ────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SavedEventsResponse {
    pub success: bool,
    pub events: Vec<EventSummary>,
}

/// List the caller's saved events.
async fn get_saved_events(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SavedEventsResponse>> {
    let docs = state.db.get_saved_events(&user.uid).await?;

    let events = docs
        .iter()
        .map(|raw| {
            // Saved copies carry the original event id; fall back to the
            // document id for records written before it was stored.
            let event_id = match &raw.event_id {
                Some(Value::String(id)) if !id.is_empty() => id.clone(),
                _ => raw.id.clone().unwrap_or_default(),
            };
            EventSummary::from_event(&Event::from_raw(event_id, raw))
        })
        .collect();

    Ok(Json(SavedEventsResponse {
        success: true,
        events,
    }))
}

#[derive(Serialize)]
struct SaveEventResponse {
    success: bool,
}

/// Save a copy of an event for the signed-in user.
async fn save_event(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<RawEvent>,
) -> Result<Json<SaveEventResponse>> {
    let event_id = body
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("Event ID is required".to_string()))?;

    let saved = SavedEvent::from_raw(&user.uid, event_id, &body, now_rfc3339());
    state.db.set_saved_event(&saved).await?;

    tracing::debug!(uid = %user.uid, event_id, "Event saved");

    Ok(Json(SaveEventResponse { success: true }))
}

#[derive(Deserialize)]
struct DeleteEventRequest {
    #[serde(rename = "eventId")]
    event_id: String,
}

/// Remove a saved event. Only the owner recorded on the document may
/// delete it.
async fn delete_saved_event(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<DeleteEventRequest>,
) -> Result<Json<SaveEventResponse>> {
    if body.event_id.is_empty() {
        return Err(AppError::BadRequest("Event ID is required".to_string()));
    }

    let saved = state
        .db
        .get_saved_event(&user.uid, &body.event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Saved event {} not found", body.event_id)))?;

    if saved.user_id != user.uid {
        return Err(AppError::Forbidden(
            "Saved event belongs to another user".to_string(),
        ));
    }

    state
        .db
        .delete_saved_event(&user.uid, &body.event_id)
        .await?;

    Ok(Json(SaveEventResponse { success: true }))
}

// ─── Event Submission ────────────────────────────────────────

#[derive(Deserialize)]
struct CreateEventRequest {
    #[serde(rename = "eventData")]
    event_data: EventSubmission,
}

#[derive(Serialize)]
struct CreateEventResponse {
    success: bool,
}

/// Accept a public event submission. Geocoding failures route the record
/// to manual review instead of rejecting it.
async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateEventRequest>,
) -> Result<Json<CreateEventResponse>> {
    let submission = body.event_data;

    if submission.validate().is_err() || !submission.has_date() {
        return Err(AppError::BadRequest(
            "Invalid or missing required fields".to_string(),
        ));
    }

    let (collection, coords) = match state.geocoder.geocode_address(&submission.location).await {
        Ok(coords) => (collections::EVENTS, Some(coords)),
        Err(e) => {
            tracing::warn!(error = %e, "Geocoding failed, routing to manual review");
            (collections::EVENTS_MANUAL_REVIEW, None)
        }
    };

    let stored = StoredSubmission::new(submission, coords, now_rfc3339());
    state.db.add_submission(collection, &stored).await?;

    tracing::info!(collection, "Event submission stored");

    Ok(Json(CreateEventResponse { success: true }))
}
