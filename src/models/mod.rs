// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod city;
pub mod event;
pub mod poll;
pub mod profile;
pub mod saved_event;
pub mod submission;

pub use city::{CityDirectory, LatLng, RawCity};
pub use event::{Event, RawEvent};
pub use poll::{PollAnswer, PollCounts};
pub use profile::UserProfile;
pub use saved_event::SavedEvent;
pub use submission::{EventSubmission, StoredSubmission};
