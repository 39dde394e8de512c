// SPDX-License-Identifier: MIT

//! Per-user saved copies of events.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::event::{coerce_bool, coerce_number, coerce_string};
use crate::models::RawEvent;

/// Saved event stored in Firestore, keyed by `{user_id}_{event_id}`.
///
/// Only the allowed event fields are copied from the save request; the
/// record is exclusively owned by `user_id`, which is checked on every
/// mutating request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedEvent {
    pub user_id: String,
    pub event_id: String,
    /// When the user saved the event (RFC3339).
    pub saved_at: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lng: f64,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, rename = "festival")]
    pub is_festival: bool,
    #[serde(default)]
    pub is_music: bool,
    #[serde(default)]
    pub google_timestamp: String,
}

impl SavedEvent {
    /// Composite document id; the event id is URL-encoded so arbitrary ids
    /// stay within Firestore's document-name rules.
    pub fn doc_id(user_id: &str, event_id: &str) -> String {
        format!("{}_{}", user_id, urlencoding::encode(event_id))
    }

    /// Copy the allowed fields out of an untrusted save request.
    pub fn from_raw(user_id: &str, event_id: &str, raw: &RawEvent, saved_at: String) -> Self {
        let google_timestamp = match &raw.google_timestamp {
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        };

        Self {
            user_id: user_id.to_string(),
            event_id: event_id.to_string(),
            saved_at,
            name: coerce_string(&raw.name),
            location: coerce_string(&raw.location),
            date: coerce_string(&raw.date),
            lat: coerce_number(&raw.lat),
            lng: coerce_number(&raw.lng),
            details: coerce_string(&raw.details),
            is_recurring: coerce_bool(&raw.is_recurring),
            is_festival: coerce_bool(&raw.festival),
            is_music: coerce_bool(&raw.is_music),
            google_timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_doc_id_is_composite_and_encoded() {
        assert_eq!(SavedEvent::doc_id("u1", "ev42"), "u1_ev42");
        assert_eq!(SavedEvent::doc_id("u1", "a/b c"), "u1_a%2Fb%20c");
    }

    #[test]
    fn test_from_raw_copies_allowed_fields() {
        let raw: RawEvent = serde_json::from_value(json!({
            "name": "Open Mic",
            "location": "123 Main St, Spokane WA",
            "date": "Wednesday",
            "isRecurring": true,
            "festival": false,
            "details": "<p>weekly</p>",
            "googleTimestamp": "2026-01-02T03:04:05Z",
        }))
        .unwrap();

        let saved = SavedEvent::from_raw("u1", "ev1", &raw, "2026-08-07T00:00:00Z".into());

        assert_eq!(saved.user_id, "u1");
        assert_eq!(saved.event_id, "ev1");
        assert_eq!(saved.name, "Open Mic");
        assert!(saved.is_recurring);
        assert!(!saved.is_festival);
        assert_eq!(saved.google_timestamp, "2026-01-02T03:04:05Z");
    }
}
