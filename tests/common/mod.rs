// SPDX-License-Identifier: MIT

use humor_hub::config::Config;
use humor_hub::db::FirestoreDb;
use humor_hub::routes::create_router;
use humor_hub::services::{
    EmailService, EventCatalog, GeocodeService, GoogleOidcVerifier, NewsService,
};
use humor_hub::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();
    let catalog = EventCatalog::new(db.clone());
    let geocoder = GeocodeService::new(&config.google_maps_api_key);
    let news = NewsService::new("");
    let mailer = EmailService::new("", "", "", "");
    let google_verifier =
        Arc::new(GoogleOidcVerifier::new(&config).expect("Failed to build verifier"));

    let state = Arc::new(AppState {
        config,
        db,
        catalog,
        geocoder,
        news,
        mailer,
        google_verifier,
    });

    (create_router(state.clone()), state)
}
