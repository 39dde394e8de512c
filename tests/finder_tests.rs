// SPDX-License-Identifier: MIT

//! End-to-end tests of the finder derivation over a realistic catalog:
//! normalization from raw documents through tab/city/date filtering and
//! nearest-city lookup.

use chrono::NaiveDate;
use humor_hub::models::{CityDirectory, Event, LatLng, RawCity, RawEvent};
use humor_hub::services::finder::{self, FilterParams, Tab, ALL_CITIES_LABEL};
use humor_hub::services::geo;
use serde_json::json;

fn event(fields: serde_json::Value) -> Event {
    let id = fields["id"].as_str().unwrap_or("test").to_string();
    let raw: RawEvent = serde_json::from_value(fields).unwrap();
    Event::from_raw(id, &raw)
}

/// A small catalog spanning tabs, cities, and recurrence kinds.
fn catalog() -> Vec<Event> {
    vec![
        event(json!({
            "id": "spokane-wed-mic",
            "name": "Test Mic",
            "location": "123 Main St, Spokane WA",
            "date": "Wednesday",
            "isRecurring": true,
            "googleTimestamp": "2026-05-01T00:00:00Z",
        })),
        event(json!({
            "id": "spokane-club-mic",
            "name": "Club Showcase",
            "location": "Spokane Comedy Club, Spokane WA",
            "date": "Monday",
            "isRecurring": true,
            "googleTimestamp": "2025-01-01T00:00:00Z",
        })),
        event(json!({
            "id": "spokane-festival",
            "name": "Spokane Laugh Fest",
            "location": "Riverfront Park, Spokane WA",
            "date": "2026-08-05",
            "festival": true,
            "googleTimestamp": "2026-06-01T00:00:00Z",
        })),
        event(json!({
            "id": "boise-music",
            "name": "Boise Songwriter Night",
            "location": "Neurolux, Boise ID",
            "date": "Thursday",
            "isRecurring": true,
            "isMusic": true,
            "googleTimestamp": "2026-04-01T00:00:00Z",
        })),
        event(json!({
            "id": "no-city",
            "name": "Mystery Mic",
            "location": "Somewhere",
            "date": "Wednesday",
            "isRecurring": true,
        })),
    ]
}

// 2026-08-05 is a Wednesday.
fn wednesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
}

#[test]
fn recurring_mic_shows_up_on_matching_weekday() {
    let events = catalog();
    let views = finder::derive_views(
        &events,
        &FilterParams {
            tab: Tab::Mics,
            city: "Spokane WA".to_string(),
            date: wednesday(),
        },
    );

    let names: Vec<&str> = views.recurring_today.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Test Mic"]);
}

#[test]
fn recurring_mic_moves_to_city_list_on_other_days() {
    let events = catalog();
    let thursday = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
    let views = finder::derive_views(
        &events,
        &FilterParams {
            tab: Tab::Mics,
            city: "Spokane WA".to_string(),
            date: thursday,
        },
    );

    assert!(views.recurring_today.is_empty());
    assert!(views
        .all_for_city
        .iter()
        .any(|e| e.id == "spokane-wed-mic"));
}

#[test]
fn festival_tab_sees_only_festivals() {
    let events = catalog();
    let views = finder::derive_views(
        &events,
        &FilterParams {
            tab: Tab::Festivals,
            city: "Spokane WA".to_string(),
            date: wednesday(),
        },
    );

    assert_eq!(views.one_time_on_date.len(), 1);
    assert_eq!(views.one_time_on_date[0].id, "spokane-festival");
    assert_eq!(views.all_for_city.len(), 1);
}

#[test]
fn music_events_live_in_the_other_tab() {
    let events = catalog();
    let thursday = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
    let views = finder::derive_views(
        &events,
        &FilterParams {
            tab: Tab::Other,
            city: "Boise ID".to_string(),
            date: thursday,
        },
    );

    assert_eq!(views.recurring_today.len(), 1);
    assert_eq!(views.recurring_today[0].id, "boise-music");

    // And it never leaks into the Mics tab.
    let mics = finder::derive_views(
        &events,
        &FilterParams {
            tab: Tab::Mics,
            city: "Boise ID".to_string(),
            date: thursday,
        },
    );
    assert!(mics.recurring_today.is_empty());
}

#[test]
fn flagship_venue_leads_the_city_listing() {
    let events = catalog();
    let views = finder::derive_views(
        &events,
        &FilterParams {
            tab: Tab::Mics,
            city: "Spokane WA".to_string(),
            date: wednesday(),
        },
    );

    assert_eq!(views.all_for_city[0].id, "spokane-club-mic");
    // The rest follow in freshness order.
    assert_eq!(views.all_for_city[1].id, "spokane-wed-mic");
}

#[test]
fn all_cities_includes_event_without_city_token() {
    let events = catalog();
    let views = finder::derive_views(
        &events,
        &FilterParams {
            tab: Tab::Mics,
            city: ALL_CITIES_LABEL.to_string(),
            date: wednesday(),
        },
    );

    assert!(views.all_for_city.iter().any(|e| e.id == "no-city"));
    assert!(views.recurring_today.iter().any(|e| e.id == "no-city"));
}

#[test]
fn nearest_city_from_directory() {
    let directory = CityDirectory::from_docs(vec![
        RawCity {
            city: Some("A".to_string()),
            coordinates: Some(LatLng { lat: 0.0, lng: 0.0 }),
        },
        RawCity {
            city: Some("B".to_string()),
            coordinates: Some(LatLng { lat: 1.0, lng: 1.0 }),
        },
        RawCity {
            city: Some("C".to_string()),
            coordinates: Some(LatLng {
                lat: 10.0,
                lng: 10.0,
            }),
        },
    ]);

    assert_eq!(
        geo::nearest_city(0.1, 0.1, directory.coordinates()),
        Some("A")
    );
}

#[test]
fn union_of_tabs_covers_whole_catalog() {
    let events = catalog();
    let all: usize = [Tab::Mics, Tab::Festivals, Tab::Other]
        .into_iter()
        .map(|tab| events.iter().filter(|e| tab.matches(e)).count())
        .sum();

    assert_eq!(all, events.len());
}
