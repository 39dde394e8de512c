// SPDX-License-Identifier: MIT

//! News proxy and contact-form routes.

use axum::{
    extract::{Query, State},
    http::header,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::AppState;

/// Cookie remembering the last requested news category.
const LAST_CATEGORY_COOKIE: &str = "lastCategory";
const DEFAULT_CATEGORY: &str = "top";
const NEWS_CACHE_CONTROL: &str = "public, max-age=3600";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/news", get(get_news))
        .route("/api/contact", post(send_contact))
}

// ─── News ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NewsQuery {
    category: Option<String>,
    q: Option<String>,
}

/// Proxy headlines from the news provider.
///
/// The category falls back to the caller's last choice (cookie), and
/// responses are cacheable for an hour to stay inside provider limits.
async fn get_news(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<NewsQuery>,
) -> Result<(CookieJar, [(header::HeaderName, &'static str); 1], Json<serde_json::Value>)> {
    let category = params
        .category
        .filter(|c| !c.is_empty())
        .or_else(|| jar.get(LAST_CATEGORY_COOKIE).map(|c| c.value().to_string()))
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    tracing::debug!(category = %category, query = ?params.q, "Fetching news");

    let results = state
        .news
        .fetch_headlines(&category, params.q.as_deref())
        .await?;

    let mut cookie = Cookie::new(LAST_CATEGORY_COOKIE, category);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");

    Ok((
        jar.add(cookie),
        [(header::CACHE_CONTROL, NEWS_CACHE_CONTROL)],
        Json(results),
    ))
}

// ─── Contact ─────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
struct ContactRequest {
    #[validate(length(min = 1, max = 200))]
    name: String,
    #[validate(email)]
    email: String,
    #[validate(length(min = 1, max = 5000))]
    message: String,
}

#[derive(Serialize)]
struct ContactResponse {
    success: bool,
}

/// Relay a contact-form message through the email provider.
async fn send_contact(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ContactRequest>,
) -> Result<Json<ContactResponse>> {
    if body.validate().is_err() {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    }

    if !state.mailer.is_configured() {
        return Err(AppError::Internal(anyhow::anyhow!(
            "Email service not configured"
        )));
    }

    state
        .mailer
        .send_contact(&body.name, &body.email, &body.message)
        .await?;

    Ok(Json(ContactResponse { success: true }))
}
