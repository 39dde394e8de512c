// SPDX-License-Identifier: MIT

//! User profile model for storage and API.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore at `users/{uid}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Short bio shown on the profile page
    #[serde(default)]
    pub bio: String,
    /// URL of the profile image (storage itself is external)
    #[serde(default)]
    pub profile_image_url: String,
    /// Email from the Google sign-in (may be empty for legacy accounts)
    #[serde(default)]
    pub email: String,
    /// When the profile was first created (RFC3339)
    #[serde(default)]
    pub created_at: String,
    /// Last profile update (RFC3339)
    #[serde(default)]
    pub updated_at: String,
}
