// SPDX-License-Identifier: MIT

//! Publicly submitted events awaiting the directory.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::LatLng;

/// Event submission from the public form.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventSubmission {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 300))]
    pub location: String,
    #[validate(length(min = 1, max = 5000))]
    pub details: String,
    /// Weekday name for recurring events or a calendar date.
    #[serde(default)]
    pub date: String,
    /// Alternate date field used by older form versions.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub festival: bool,
    #[serde(default)]
    pub is_music: bool,
}

impl EventSubmission {
    /// A submission needs some date signal on either field.
    pub fn has_date(&self) -> bool {
        !self.date.trim().is_empty() || !self.timestamp.trim().is_empty()
    }
}

/// Submission as stored: the submitted fields plus geocoded coordinates
/// (absent when the address could not be resolved and the record was
/// routed to manual review).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSubmission {
    pub name: String,
    pub location: String,
    pub details: String,
    pub date: String,
    pub timestamp: String,
    pub is_recurring: bool,
    pub festival: bool,
    pub is_music: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    pub submission_date: String,
}

impl StoredSubmission {
    pub fn new(submission: EventSubmission, coords: Option<LatLng>, now: String) -> Self {
        Self {
            name: submission.name,
            location: submission.location,
            details: submission.details,
            date: submission.date,
            timestamp: submission.timestamp,
            is_recurring: submission.is_recurring,
            festival: submission.festival,
            is_music: submission.is_music,
            lat: coords.map(|c| c.lat),
            lng: coords.map(|c| c.lng),
            submission_date: now,
        }
    }
}
