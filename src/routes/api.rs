// SPDX-License-Identifier: MIT

//! Finder, city, poll, and profile API routes.

use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Event, PollAnswer, UserProfile};
use crate::services::finder::{self, FilterParams, MapCenter, Tab};
use crate::services::geo;
use crate::services::sanitize::sanitize_html;
use crate::time_utils::{format_utc_rfc3339, now_rfc3339};
use crate::AppState;

const DEFAULT_POLL_ID: &str = "homepage_v2";
const RECENT_EVENT_WINDOW_DAYS: i64 = 7;

/// Public API routes (no auth required).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/mic-finder/filter", get(filter_events))
        .route("/api/cities", get(get_cities))
        .route("/api/cities/nearest", get(get_nearest_city))
        .route("/api/count-events", get(count_recent_events))
        .route("/api/poll", get(get_poll).post(record_poll_vote))
}

/// Profile routes (require authentication).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/profile", get(get_profile).post(update_profile))
}

// ─── Mic Finder ──────────────────────────────────────────────

#[derive(Deserialize)]
struct FilterQuery {
    tab: Option<String>,
    city: Option<String>,
    /// Calendar date as YYYY-MM-DD; defaults to today.
    date: Option<String>,
}

/// Event fields served to the frontend; details are sanitized here.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EventSummary {
    pub id: String,
    pub name: String,
    pub location: String,
    pub date: String,
    pub lat: f64,
    pub lng: f64,
    pub details: String,
    pub is_recurring: bool,
    pub is_festival: bool,
    pub is_music: bool,
}

impl EventSummary {
    pub fn from_event(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            name: event.name.clone(),
            location: event.location.clone(),
            date: event.date.clone(),
            lat: event.lat,
            lng: event.lng,
            details: sanitize_html(&event.details),
            is_recurring: event.is_recurring,
            is_festival: event.is_festival,
            is_music: event.is_music,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MapCenterResponse {
    pub lat: f64,
    pub lng: f64,
    pub zoom: u8,
}

impl From<MapCenter> for MapCenterResponse {
    fn from(center: MapCenter) -> Self {
        Self {
            lat: center.lat,
            lng: center.lng,
            zoom: center.zoom,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FilterResponse {
    pub recurring_events: Vec<EventSummary>,
    pub one_time_events: Vec<EventSummary>,
    pub all_city_events: Vec<EventSummary>,
    pub map_events: Vec<EventSummary>,
    pub map_center: MapCenterResponse,
}

/// Derive the finder view sets for a tab/city/date selection.
async fn filter_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterQuery>,
) -> Result<Json<FilterResponse>> {
    let tab = parse_tab(params.tab.as_deref())?;
    let date = parse_filter_date(params.date.as_deref())?;
    let city = params.city.unwrap_or_default();

    tracing::debug!(tab = tab.as_str(), city = %city, date = %date, "Filtering events");

    let snapshot = state.catalog.snapshot().await?;

    let views = finder::derive_views(
        &snapshot.events,
        &FilterParams {
            tab,
            city: city.clone(),
            date,
        },
    );
    let map_center = finder::map_center(&city, &snapshot.cities);

    let summarize = |events: Vec<Event>| -> Vec<EventSummary> {
        events.iter().map(EventSummary::from_event).collect()
    };

    Ok(Json(FilterResponse {
        recurring_events: summarize(views.recurring_today),
        one_time_events: summarize(views.one_time_on_date),
        all_city_events: summarize(views.all_for_city),
        map_events: summarize(views.map_events),
        map_center: map_center.into(),
    }))
}

fn parse_tab(raw: Option<&str>) -> Result<Tab> {
    match raw {
        None | Some("") => Ok(Tab::Mics),
        Some(value) => Tab::parse(value).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unknown tab '{value}': expected Mics, Festivals, or Other"
            ))
        }),
    }
}

fn parse_filter_date(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        None | Some("") => Ok(chrono::Local::now().date_naive()),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
            AppError::BadRequest("Invalid 'date' parameter: expected YYYY-MM-DD".to_string())
        }),
    }
}

// ─── Cities ──────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CitiesResponse {
    pub cities: Vec<String>,
}

/// List supported cities, featured city first.
async fn get_cities(State(state): State<Arc<AppState>>) -> Result<Json<CitiesResponse>> {
    let snapshot = state.catalog.snapshot().await?;

    Ok(Json(CitiesResponse {
        cities: snapshot.cities.names().to_vec(),
    }))
}

#[derive(Deserialize)]
struct NearestCityQuery {
    lat: Option<f64>,
    lng: Option<f64>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NearestCityResponse {
    pub city: String,
}

/// Resolve the supported city closest to the given coordinates.
async fn get_nearest_city(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearestCityQuery>,
) -> Result<Json<NearestCityResponse>> {
    let (Some(lat), Some(lng)) = (params.lat, params.lng) else {
        return Err(AppError::BadRequest(
            "Both 'lat' and 'lng' are required".to_string(),
        ));
    };

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(AppError::BadRequest(
            "Coordinates out of range".to_string(),
        ));
    }

    let snapshot = state.catalog.snapshot().await?;

    match geo::nearest_city(lat, lng, snapshot.cities.coordinates()) {
        Some(city) => Ok(Json(NearestCityResponse {
            city: city.to_string(),
        })),
        None => Err(AppError::NotFound(
            "No supported cities found nearby".to_string(),
        )),
    }
}

// ─── Event Count ─────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EventCountResponse {
    pub count: usize,
}

/// Number of events added within the last week.
async fn count_recent_events(
    State(state): State<Arc<AppState>>,
) -> Result<Json<EventCountResponse>> {
    let cutoff = chrono::Utc::now() - chrono::Duration::days(RECENT_EVENT_WINDOW_DAYS);
    let count = state
        .db
        .count_events_since(&format_utc_rfc3339(cutoff))
        .await?;

    Ok(Json(EventCountResponse { count }))
}

// ─── Poll ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PollQuery {
    id: Option<String>,
}

#[derive(Deserialize)]
struct PollVoteRequest {
    #[serde(rename = "pollId")]
    poll_id: Option<String>,
    answer: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PollResponse {
    pub success: bool,
    pub yes_count: i64,
    pub no_count: i64,
    pub total_count: i64,
}

/// Read poll counters.
async fn get_poll(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PollQuery>,
) -> Result<Json<PollResponse>> {
    let poll_id = effective_poll_id(params.id.as_deref());
    let counts = state
        .db
        .get_poll(&poll_id)
        .await?
        .unwrap_or_default()
        .normalized();

    Ok(Json(PollResponse {
        success: true,
        yes_count: counts.yes_count,
        no_count: counts.no_count,
        total_count: counts.total_count,
    }))
}

/// Record a poll vote and return the updated counters.
async fn record_poll_vote(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PollVoteRequest>,
) -> Result<Json<PollResponse>> {
    let answer = PollAnswer::parse(&body.answer)
        .ok_or_else(|| AppError::BadRequest("Invalid answer".to_string()))?;
    let poll_id = effective_poll_id(body.poll_id.as_deref());

    let counts = state
        .db
        .record_poll_vote(&poll_id, answer, &now_rfc3339())
        .await?
        .normalized();

    Ok(Json(PollResponse {
        success: true,
        yes_count: counts.yes_count,
        no_count: counts.no_count,
        total_count: counts.total_count,
    }))
}

fn effective_poll_id(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => DEFAULT_POLL_ID.to_string(),
    }
}

// ─── Profile ─────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileResponse {
    pub success: bool,
    pub profile: ProfileBody,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileBody {
    pub name: String,
    pub bio: String,
    pub profile_image_url: String,
}

/// Get the caller's profile; missing profiles read as empty.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let profile = state.db.get_profile(&user.uid).await?.unwrap_or_default();

    Ok(Json(ProfileResponse {
        success: true,
        profile: ProfileBody {
            name: profile.name,
            bio: profile.bio,
            profile_image_url: profile.profile_image_url,
        },
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileUpdateRequest {
    name: Option<String>,
    bio: Option<String>,
    profile_image_url: Option<String>,
}

#[derive(Serialize)]
struct ProfileUpdateResponse {
    success: bool,
}

/// Update the caller's profile. Fetch-modify-write so fields not present
/// in the request survive.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<ProfileUpdateRequest>,
) -> Result<Json<ProfileUpdateResponse>> {
    let mut profile: UserProfile = state.db.get_profile(&user.uid).await?.unwrap_or_else(|| {
        UserProfile {
            created_at: now_rfc3339(),
            ..UserProfile::default()
        }
    });

    if let Some(name) = body.name {
        profile.name = name;
    }
    if let Some(bio) = body.bio {
        profile.bio = bio;
    }
    if let Some(url) = body.profile_image_url {
        profile.profile_image_url = url;
    }
    profile.updated_at = now_rfc3339();

    state.db.set_profile(&user.uid, &profile).await?;

    Ok(Json(ProfileUpdateResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tab_defaults_and_rejects() {
        assert_eq!(parse_tab(None).unwrap(), Tab::Mics);
        assert_eq!(parse_tab(Some("")).unwrap(), Tab::Mics);
        assert_eq!(parse_tab(Some("Festivals")).unwrap(), Tab::Festivals);
        assert!(matches!(
            parse_tab(Some("Karaoke")),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_parse_filter_date() {
        let date = parse_filter_date(Some("2026-08-05")).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 8, 5).unwrap());

        assert!(parse_filter_date(Some("08/05/2026")).is_err());
        assert!(parse_filter_date(None).is_ok());
    }

    #[test]
    fn test_effective_poll_id() {
        assert_eq!(effective_poll_id(None), DEFAULT_POLL_ID);
        assert_eq!(effective_poll_id(Some("  ")), DEFAULT_POLL_ID);
        assert_eq!(effective_poll_id(Some("launch_poll")), "launch_poll");
    }
}
