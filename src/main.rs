// SPDX-License-Identifier: MIT

//! Humor Hub API Server
//!
//! Serves the mic-finder event directory, saved events, profiles, the
//! homepage poll, news proxying, and the contact form over Firestore.

use humor_hub::{
    config::Config,
    db::FirestoreDb,
    services::{EmailService, EventCatalog, GeocodeService, GoogleOidcVerifier, NewsService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Humor Hub API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Event/city snapshot cache
    let catalog = EventCatalog::new(db.clone());

    // Third-party API clients
    let geocoder = GeocodeService::new(&config.google_maps_api_key);
    let news = NewsService::new(&config.newsdata_api_key);
    let mailer = EmailService::new(
        &config.emailjs_service_id,
        &config.emailjs_template_id,
        &config.emailjs_public_key,
        &config.emailjs_private_key,
    );

    let google_verifier =
        Arc::new(GoogleOidcVerifier::new(&config).expect("Failed to initialize OIDC verifier"));

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        catalog,
        geocoder,
        news,
        mailer,
        google_verifier,
    });

    // Build router
    let app = humor_hub::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("humor_hub=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
