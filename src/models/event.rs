// SPDX-License-Identifier: MIT

//! Event records: the untrusted Firestore document shape and the strict
//! internal type produced by normalization.
//!
//! Firestore event documents are written by several producers (the event
//! form, bulk uploads, scrapers) and fields routinely arrive missing or
//! mistyped. `RawEvent` models that honestly with loose optional values;
//! `Event::from_raw` is the single point of coercion into the typed form
//! and never fails.

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use serde_json::Value;

/// Venue string that sorts to the top of city listings.
pub const FLAGSHIP_VENUE: &str = "Spokane Comedy Club";

/// Untrusted event document as stored in Firestore.
///
/// Every field is optional and loosely typed; saved-event documents share
/// this shape plus the ownership fields at the bottom.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    /// Document id, injected by the firestore crate.
    #[serde(default, alias = "_firestore_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub location: Option<Value>,
    #[serde(default)]
    pub date: Option<Value>,
    #[serde(default)]
    pub lat: Option<Value>,
    #[serde(default)]
    pub lng: Option<Value>,
    #[serde(default)]
    pub details: Option<Value>,
    #[serde(default)]
    pub is_recurring: Option<Value>,
    #[serde(default)]
    pub festival: Option<Value>,
    #[serde(default)]
    pub is_music: Option<Value>,
    #[serde(default)]
    pub google_timestamp: Option<Value>,

    // Present on saved-event documents only.
    #[serde(default)]
    pub event_id: Option<Value>,
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default)]
    pub saved_at: Option<Value>,
}

/// Fully-typed event, normalized once per fetch.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: String,
    pub name: String,
    /// Free-text address/venue string; the city token follows the first comma.
    pub location: String,
    /// Either a weekday name (recurring) or a calendar date (one-time).
    pub date: String,
    pub lat: f64,
    pub lng: f64,
    /// Rich text; sanitize before serving.
    pub details: String,
    pub is_recurring: bool,
    pub is_festival: bool,
    pub is_music: bool,
    /// Freshness ordering key in epoch milliseconds (0 when absent).
    pub numeric_timestamp: i64,

    // Derived fields, computed by the normalizer.
    pub location_lower: String,
    /// Trimmed token after the first comma of `location`; empty = no city.
    pub normalized_city: String,
    pub is_flagship_venue: bool,
    /// Day-of-week index (Sunday=0) when recurring, else None.
    pub recurring_dow: Option<u32>,
    /// Midnight of the event's calendar day when one-time, else None.
    pub date_ms: Option<i64>,
}

impl Event {
    /// Normalize a raw document into a typed event. Total: malformed input
    /// coerces to defaults instead of erroring.
    pub fn from_raw(id: impl Into<String>, raw: &RawEvent) -> Self {
        let name = coerce_string(&raw.name);
        let location = coerce_string(&raw.location);
        let date = coerce_string(&raw.date);
        let is_recurring = coerce_bool(&raw.is_recurring);

        let location_lower = location.to_lowercase();
        let is_flagship_venue = location.contains(FLAGSHIP_VENUE);
        let normalized_city = extract_city_from_location(&location);

        let mut recurring_dow = None;
        let mut date_ms = None;

        if is_recurring && !date.is_empty() {
            recurring_dow = weekday_index(&date);
        }
        if !is_recurring && !date.is_empty() {
            date_ms = parse_event_date(&date).map(midnight_ms);
        }

        Self {
            id: id.into(),
            name,
            location,
            date,
            lat: coerce_number(&raw.lat),
            lng: coerce_number(&raw.lng),
            details: coerce_string(&raw.details),
            is_recurring,
            is_festival: coerce_bool(&raw.festival),
            is_music: coerce_bool(&raw.is_music),
            numeric_timestamp: parse_timestamp_ms(&raw.google_timestamp),
            location_lower,
            normalized_city,
            is_flagship_venue,
            recurring_dow,
            date_ms,
        }
    }
}

// ─── Coercion helpers ────────────────────────────────────────

pub(crate) fn coerce_string(value: &Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

pub(crate) fn coerce_number(value: &Option<Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    }
}

pub(crate) fn coerce_bool(value: &Option<Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        _ => false,
    }
}

/// Day-of-week index for the exact seven English day names, Sunday=0.
/// Case-sensitive; anything else is not a recurrence day.
pub fn weekday_index(day: &str) -> Option<u32> {
    match day {
        "Sunday" => Some(0),
        "Monday" => Some(1),
        "Tuesday" => Some(2),
        "Wednesday" => Some(3),
        "Thursday" => Some(4),
        "Friday" => Some(5),
        "Saturday" => Some(6),
        _ => None,
    }
}

/// Parse a one-time event date from the formats seen in stored data.
pub fn parse_event_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    for format in ["%m/%d/%Y", "%m/%d/%y", "%B %d, %Y", "%b %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    None
}

/// Milliseconds at midnight of the given day. Idempotent with respect to
/// re-normalizing a date that is already at midnight.
pub fn midnight_ms(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp_millis()
}

/// Trimmed second comma-delimited segment of a location string.
pub fn extract_city_from_location(location: &str) -> String {
    location
        .split(',')
        .nth(1)
        .map(str::trim)
        .unwrap_or("")
        .to_string()
}

fn parse_timestamp_ms(value: &Option<Value>) -> i64 {
    match value {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.timestamp_millis())
            .unwrap_or(0),
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(fields: Value) -> RawEvent {
        serde_json::from_value(fields).unwrap()
    }

    #[test]
    fn test_normalizer_coerces_missing_fields() {
        let event = Event::from_raw("e1", &raw(json!({})));

        assert_eq!(event.name, "");
        assert_eq!(event.location, "");
        assert_eq!(event.lat, 0.0);
        assert!(!event.is_recurring);
        assert!(!event.is_festival);
        assert_eq!(event.numeric_timestamp, 0);
        assert_eq!(event.recurring_dow, None);
        assert_eq!(event.date_ms, None);
    }

    #[test]
    fn test_normalizer_coerces_mistyped_fields() {
        let event = Event::from_raw(
            "e2",
            &raw(json!({
                "name": 42,
                "lat": "not a number",
                "isRecurring": "true",
                "festival": 1,
                "isMusic": 0,
            })),
        );

        assert_eq!(event.name, "");
        assert_eq!(event.lat, 0.0);
        assert!(event.is_recurring);
        assert!(event.is_festival);
        assert!(!event.is_music);
    }

    #[test]
    fn test_recurring_event_has_dow_only() {
        let event = Event::from_raw(
            "e3",
            &raw(json!({"date": "Wednesday", "isRecurring": true})),
        );

        assert_eq!(event.recurring_dow, Some(3));
        assert_eq!(event.date_ms, None);
    }

    #[test]
    fn test_one_time_event_has_date_ms_only() {
        let event = Event::from_raw(
            "e4",
            &raw(json!({"date": "2026-08-07", "isRecurring": false})),
        );

        assert_eq!(event.recurring_dow, None);
        let expected = midnight_ms(NaiveDate::from_ymd_opt(2026, 8, 7).unwrap());
        assert_eq!(event.date_ms, Some(expected));
    }

    #[test]
    fn test_unparseable_date_yields_no_date() {
        let event = Event::from_raw("e5", &raw(json!({"date": "sometime soon"})));
        assert_eq!(event.recurring_dow, None);
        assert_eq!(event.date_ms, None);
    }

    #[test]
    fn test_weekday_index_exact_names() {
        let names = [
            ("Sunday", 0),
            ("Monday", 1),
            ("Tuesday", 2),
            ("Wednesday", 3),
            ("Thursday", 4),
            ("Friday", 5),
            ("Saturday", 6),
        ];
        for (name, index) in names {
            assert_eq!(weekday_index(name), Some(index), "{name}");
        }

        // Case-sensitive: only the exact capitalized names match.
        assert_eq!(weekday_index("sunday"), None);
        assert_eq!(weekday_index("MONDAY"), None);
        assert_eq!(weekday_index("2026-08-07"), None);
        assert_eq!(weekday_index(""), None);
    }

    #[test]
    fn test_midnight_normalization_is_idempotent() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let ms = midnight_ms(date);

        // Re-parsing the normalized instant lands on the same midnight.
        let roundtrip = DateTime::from_timestamp_millis(ms).unwrap().date_naive();
        assert_eq!(midnight_ms(roundtrip), ms);
        assert_eq!(ms % 86_400_000, 0);
    }

    #[test]
    fn test_city_extraction() {
        assert_eq!(
            extract_city_from_location("123 Main St, Spokane WA"),
            "Spokane WA"
        );
        assert_eq!(
            extract_city_from_location("Club,  Seattle WA , USA"),
            "Seattle WA"
        );
        assert_eq!(extract_city_from_location("No city here"), "");
        assert_eq!(extract_city_from_location(""), "");
    }

    #[test]
    fn test_flagship_venue_flag() {
        let event = Event::from_raw(
            "e6",
            &raw(json!({"location": "Spokane Comedy Club, Spokane WA"})),
        );
        assert!(event.is_flagship_venue);
        assert_eq!(event.normalized_city, "Spokane WA");
    }

    #[test]
    fn test_timestamp_parsing() {
        let event = Event::from_raw(
            "e7",
            &raw(json!({"googleTimestamp": "2026-01-02T03:04:05Z"})),
        );
        assert!(event.numeric_timestamp > 0);

        let bad = Event::from_raw("e8", &raw(json!({"googleTimestamp": "yesterday"})));
        assert_eq!(bad.numeric_timestamp, 0);
    }
}
