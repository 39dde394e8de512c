// SPDX-License-Identifier: MIT

//! Mic-finder view derivation.
//!
//! Pure functions over an immutable event snapshot: given the selected
//! tab, city, and date, derive the filtered/sorted subsets the finder
//! pages display. Nothing here can fail; absence of matches is an empty
//! list.

use chrono::{Datelike, NaiveDate};

use crate::models::event::midnight_ms;
use crate::models::{CityDirectory, Event};

/// Sentinel city value meaning "no city filter".
pub const ALL_CITIES_LABEL: &str = "All Cities";

/// Map defaults: continental US center at country zoom.
pub const DEFAULT_US_CENTER: (f64, f64) = (39.8283, -98.5795);
pub const DEFAULT_ZOOM: u8 = 4;
pub const CITY_ZOOM: u8 = 12;

/// Finder tab. Every event belongs to exactly one tab: the festival flag
/// wins over the music flag, and events with neither land in Mics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Mics,
    Festivals,
    Other,
}

impl Tab {
    /// Bucket an event. The festival-before-music precedence keeps the
    /// three buckets a partition of the full list.
    pub fn classify(event: &Event) -> Tab {
        if event.is_festival {
            Tab::Festivals
        } else if event.is_music {
            Tab::Other
        } else {
            Tab::Mics
        }
    }

    pub fn matches(self, event: &Event) -> bool {
        Tab::classify(event) == self
    }

    pub fn parse(value: &str) -> Option<Tab> {
        match value {
            "Mics" => Some(Tab::Mics),
            "Festivals" => Some(Tab::Festivals),
            "Other" => Some(Tab::Other),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Mics => "Mics",
            Tab::Festivals => "Festivals",
            Tab::Other => "Other",
        }
    }
}

/// View parameters for one derivation call.
#[derive(Debug, Clone)]
pub struct FilterParams {
    pub tab: Tab,
    /// Selected city display name; empty or [`ALL_CITIES_LABEL`] disables
    /// the city dimension.
    pub city: String,
    pub date: NaiveDate,
}

/// The derived result sets for one view request.
#[derive(Debug, Clone, Default)]
pub struct EventViews {
    /// Recurring events whose weekday matches the selected date.
    pub recurring_today: Vec<Event>,
    /// One-time events falling exactly on the selected date.
    pub one_time_on_date: Vec<Event>,
    /// Every tab/city match regardless of date, flagship venue first,
    /// then most recently added.
    pub all_for_city: Vec<Event>,
    /// The all-for-city set without the sort, for map pin rendering.
    pub map_events: Vec<Event>,
}

/// Derive all view subsets from a flat event snapshot.
pub fn derive_views(events: &[Event], params: &FilterParams) -> EventViews {
    let city = effective_city(&params.city);
    let city_lower = city.to_lowercase();
    let dow = params.date.weekday().num_days_from_sunday();
    let date_ms = midnight_ms(params.date);

    // The dated views match the city as a case-insensitive substring of
    // the full location; the city listing compares the normalized city
    // token exactly.
    let location_matches = |event: &Event| {
        city_lower.is_empty() || event.location_lower.contains(&city_lower)
    };
    let city_matches = |event: &Event| city.is_empty() || event.normalized_city == city;

    let recurring_today = events
        .iter()
        .filter(|e| {
            e.is_recurring
                && params.tab.matches(e)
                && location_matches(e)
                && e.recurring_dow == Some(dow)
        })
        .cloned()
        .collect();

    let one_time_on_date = events
        .iter()
        .filter(|e| {
            !e.is_recurring
                && params.tab.matches(e)
                && location_matches(e)
                && e.date_ms == Some(date_ms)
        })
        .cloned()
        .collect();

    let map_events: Vec<Event> = events
        .iter()
        .filter(|e| params.tab.matches(e) && city_matches(e))
        .cloned()
        .collect();

    let mut all_for_city = map_events.clone();
    all_for_city.sort_by(|a, b| {
        b.is_flagship_venue
            .cmp(&a.is_flagship_venue)
            .then_with(|| b.numeric_timestamp.cmp(&a.numeric_timestamp))
    });

    EventViews {
        recurring_today,
        one_time_on_date,
        all_for_city,
        map_events,
    }
}

/// Map center for the selected city: the city's coordinates at city zoom,
/// or the US overview when no city is selected or known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapCenter {
    pub lat: f64,
    pub lng: f64,
    pub zoom: u8,
}

pub fn map_center(city: &str, cities: &CityDirectory) -> MapCenter {
    let city = effective_city(city);

    match cities.get(city) {
        Some(point) if !city.is_empty() => MapCenter {
            lat: point.y(),
            lng: point.x(),
            zoom: CITY_ZOOM,
        },
        _ => MapCenter {
            lat: DEFAULT_US_CENTER.0,
            lng: DEFAULT_US_CENTER.1,
            zoom: DEFAULT_ZOOM,
        },
    }
}

fn effective_city(city: &str) -> &str {
    let city = city.trim();
    if city == ALL_CITIES_LABEL {
        ""
    } else {
        city
    }
}
