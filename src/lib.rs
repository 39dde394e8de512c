// SPDX-License-Identifier: MIT

//! Humor Hub: backend API for comedy open-mic discovery.
//!
//! This crate provides the backend API for the mic finder (event view
//! derivation over the Firestore directory), saved events, user profiles,
//! the homepage poll, news proxying, and the contact form.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use db::FirestoreDb;
use services::{EmailService, EventCatalog, GeocodeService, GoogleOidcVerifier, NewsService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub catalog: EventCatalog,
    pub geocoder: GeocodeService,
    pub news: NewsService,
    pub mailer: EmailService,
    pub google_verifier: Arc<GoogleOidcVerifier>,
}
