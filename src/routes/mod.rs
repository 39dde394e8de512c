// SPDX-License-Identifier: MIT

//! HTTP route handlers.

pub mod api;
pub mod auth;
pub mod events;
pub mod news;

use crate::middleware::auth::require_auth;
use crate::AppState;
use axum::http::{header, Method};
use axum::{extract::State, middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Static sitemap entries: (path, priority).
const SITEMAP_STATIC_ROUTES: &[(&str, &str)] = &[
    ("", "1.0"),
    ("/MicFinder", "0.9"),
    ("/News", "0.8"),
    ("/Profile", "0.6"),
    ("/contact", "0.5"),
    ("/about", "0.7"),
    ("/userAgreement", "0.3"),
    ("/privacyPolicy", "0.3"),
];

/// Sitemap: static pages plus one finder URL per supported city.
async fn sitemap(State(state): State<Arc<AppState>>) -> ([(header::HeaderName, &'static str); 1], String) {
    let base = state.config.site_url.trim_end_matches('/');
    let mut urls: Vec<(String, &str)> = SITEMAP_STATIC_ROUTES
        .iter()
        .map(|(path, priority)| (format!("{base}{path}"), *priority))
        .collect();

    // City pages are nice-to-have; serve the static set if the catalog
    // is unavailable.
    match state.catalog.snapshot().await {
        Ok(snapshot) => {
            for city in snapshot.cities.names() {
                urls.push((
                    format!("{base}/MicFinder?city={}", urlencoding::encode(city)),
                    "0.85",
                ));
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Sitemap: failed to fetch cities");
        }
    }

    let entries: String = urls
        .iter()
        .map(|(loc, priority)| {
            format!("  <url>\n    <loc>{loc}</loc>\n    <priority>{priority}</priority>\n  </url>\n")
        })
        .collect();

    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{entries}</urlset>\n"
    );

    ([(header::CONTENT_TYPE, "application/xml")], xml)
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from frontend URL and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/sitemap.xml", get(sitemap))
        .merge(auth::routes())
        .merge(api::routes())
        .merge(events::routes())
        .merge(news::routes());

    // Protected routes (session required)
    let protected_routes = api::protected_routes()
        .merge(events::protected_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
