// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Events and cities (public directory, read-only)
//! - Saved events (per-user copies, ownership-checked)
//! - User profiles
//! - Poll counters
//! - Event submissions

use crate::db::collections;
use crate::error::AppError;
use crate::models::{
    PollAnswer, PollCounts, RawCity, RawEvent, SavedEvent, StoredSubmission, UserProfile,
};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Event Directory Operations ──────────────────────────────

    /// Fetch every event document in the public directory.
    pub async fn list_event_docs(&self) -> Result<Vec<RawEvent>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USER_EVENTS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch the supported-city coordinate documents.
    pub async fn list_city_docs(&self) -> Result<Vec<RawCity>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::CITIES)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count events added on or after the given RFC3339 cutoff.
    pub async fn count_events_since(&self, cutoff: &str) -> Result<usize, AppError> {
        let cutoff = cutoff.to_string();
        let events: Vec<RawEvent> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USER_EVENTS)
            .filter(move |q| {
                q.for_all([q
                    .field("googleTimestamp")
                    .greater_than_or_equal(cutoff.clone())])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(events.len())
    }

    // ─── Saved Event Operations ──────────────────────────────────

    /// Get all events a user has saved.
    pub async fn get_saved_events(&self, user_id: &str) -> Result<Vec<RawEvent>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::SAVED_EVENTS)
            .filter(move |q| q.for_all([q.field("userId").eq(user_id.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a saved-event copy under its composite document id.
    pub async fn set_saved_event(&self, saved: &SavedEvent) -> Result<(), AppError> {
        let doc_id = SavedEvent::doc_id(&saved.user_id, &saved.event_id);

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::SAVED_EVENTS)
            .document_id(&doc_id)
            .object(saved)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Look up a saved event by its composite document id.
    pub async fn get_saved_event(
        &self,
        user_id: &str,
        event_id: &str,
    ) -> Result<Option<SavedEvent>, AppError> {
        let doc_id = SavedEvent::doc_id(user_id, event_id);

        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SAVED_EVENTS)
            .obj()
            .one(&doc_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a saved event by its composite document id.
    pub async fn delete_saved_event(&self, user_id: &str, event_id: &str) -> Result<(), AppError> {
        let doc_id = SavedEvent::doc_id(user_id, event_id);

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::SAVED_EVENTS)
            .document_id(&doc_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── User Profile Operations ─────────────────────────────────

    /// Get a user profile by Google subject id.
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user profile.
    pub async fn set_profile(&self, user_id: &str, profile: &UserProfile) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(user_id)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Poll Operations ─────────────────────────────────────────

    /// Read a poll's counters.
    pub async fn get_poll(&self, poll_id: &str) -> Result<Option<PollCounts>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::POLLS)
            .obj()
            .one(poll_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Record one poll vote atomically.
    ///
    /// Uses a Firestore transaction so concurrent votes retry with fresh
    /// counters instead of losing increments. Returns the updated counts.
    pub async fn record_poll_vote(
        &self,
        poll_id: &str,
        answer: PollAnswer,
        now: &str,
    ) -> Result<PollCounts, AppError> {
        let mut transaction = self
            .get_client()?
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        // Read the current counters; this registers the document for
        // conflict detection.
        let current: Option<PollCounts> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::POLLS)
            .obj()
            .one(poll_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to read poll in transaction: {}", e)))?;

        let mut counts = current.unwrap_or_default().normalized();
        counts.record(answer, now);

        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::POLLS)
            .document_id(poll_id)
            .object(&counts)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add poll to transaction: {}", e)))?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        Ok(counts)
    }

    // ─── Event Submission Operations ─────────────────────────────

    /// Store a public event submission with a generated document id.
    pub async fn add_submission(
        &self,
        collection: &'static str,
        submission: &StoredSubmission,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .insert()
            .into(collection)
            .generate_document_id()
            .object(submission)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
