//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    /// Public event directory shown in the mic finder.
    pub const USER_EVENTS: &str = "userEvents";
    /// Supported city coordinates.
    pub const CITIES: &str = "cities";
    /// Per-user saved event copies.
    pub const SAVED_EVENTS: &str = "savedEvents";
    /// User profiles (keyed by Google subject).
    pub const USERS: &str = "users";
    /// Homepage poll counters.
    pub const POLLS: &str = "polls";
    /// Geocoded public submissions.
    pub const EVENTS: &str = "events";
    /// Submissions whose address could not be geocoded.
    pub const EVENTS_MANUAL_REVIEW: &str = "events_manual_review";
}
