// SPDX-License-Identifier: MIT

//! Google sign-in routes.
//!
//! Two paths produce a session: the full OAuth redirect flow
//! (`/auth/google/start` → `/auth/google/callback`) and the frontend's
//! one-tap flow posting an ID token to `/auth/session-login`. Both end
//! with a first-party session JWT in the `hh_session` cookie.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{AppError, Result};
use crate::middleware::auth::{
    create_session_jwt, extract_session_token, verify_session_token, SESSION_COOKIE,
    SESSION_MAX_AGE_SECONDS,
};
use crate::models::UserProfile;
use crate::services::{OidcError, VerifiedGoogleUser};
use crate::time_utils::now_rfc3339;
use crate::AppState;

use hmac::{Hmac, Mac};
use sha2::Sha256;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/google/start", get(auth_start))
        .route("/auth/google/callback", get(auth_callback))
        .route("/auth/session-login", post(session_login))
        .route("/auth/session", get(session_check))
        .route("/auth/logout", post(logout))
}

/// Query parameters for starting the OAuth flow.
#[derive(Deserialize)]
pub struct AuthStartParams {
    /// Frontend URL to redirect back to after sign-in completes.
    /// If not provided, uses the configured frontend URL.
    #[serde(default)]
    redirect_uri: Option<String>,
}

/// Start OAuth flow - redirect to Google's consent screen.
async fn auth_start(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuthStartParams>,
    headers: HeaderMap,
) -> Result<Redirect> {
    let frontend_url = params
        .redirect_uri
        .unwrap_or_else(|| state.config.frontend_url.clone());

    let oauth_state = sign_state(&frontend_url, &state.config.oauth_state_key)?;
    let callback_url = format!("{}/auth/google/callback", service_base_url(&headers));

    let auth_url = format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
        GOOGLE_AUTH_URL,
        state.config.google_client_id,
        urlencoding::encode(&callback_url),
        urlencoding::encode("openid email profile"),
        oauth_state
    );

    tracing::info!(
        client_id = %state.config.google_client_id,
        frontend_url = %frontend_url,
        "Starting OAuth flow, redirecting to Google"
    );

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct GoogleTokenResponse {
    id_token: Option<String>,
}

/// OAuth callback - exchange the code, verify the ID token, create a session.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect)> {
    // Decode and verify the frontend URL from the state parameter.
    let frontend_url = params
        .state
        .as_deref()
        .and_then(|s| verify_and_decode_state(s, &state.config.oauth_state_key))
        .unwrap_or_else(|| {
            tracing::warn!(
                "Invalid or tampered state parameter, falling back to default frontend URL"
            );
            state.config.frontend_url.clone()
        });

    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Google");
        let redirect = format!("{}?error={}", frontend_url, urlencoding::encode(&error));
        return Ok((jar, Redirect::temporary(&redirect)));
    }

    let Some(code) = params.code else {
        let redirect = format!("{}?error=missing_code", frontend_url);
        return Ok((jar, Redirect::temporary(&redirect)));
    };

    tracing::info!("Exchanging authorization code for tokens");

    let callback_url = format!("{}/auth/google/callback", service_base_url(&headers));

    let token_response = reqwest::Client::new()
        .post(GOOGLE_TOKEN_URL)
        .form(&[
            ("code", code.as_str()),
            ("client_id", state.config.google_client_id.as_str()),
            ("client_secret", state.config.google_client_secret.as_str()),
            ("redirect_uri", callback_url.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("Token exchange failed: {e}")))?;

    if !token_response.status().is_success() {
        return Err(AppError::Upstream(format!(
            "Token exchange returned status {}",
            token_response.status()
        )));
    }

    let tokens: GoogleTokenResponse = token_response
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("Invalid token response: {e}")))?;

    let id_token = tokens
        .id_token
        .ok_or_else(|| AppError::Upstream("Missing Google ID token".to_string()))?;

    let user = state
        .google_verifier
        .verify_id_token(&id_token)
        .await
        .map_err(map_oidc_error)?;

    tracing::info!(uid = %user.subject, "Google sign-in verified");

    upsert_signed_in_profile(&state, &user).await?;

    let jwt = create_session_jwt(&user.subject, &state.config.session_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Session creation failed: {}", e)))?;

    let jar = jar.add(session_cookie(jwt, is_secure_host(&headers)));

    Ok((jar, Redirect::temporary(&frontend_url)))
}

#[derive(Deserialize)]
struct SessionLoginRequest {
    #[serde(rename = "idToken")]
    id_token: String,
}

#[derive(Serialize)]
struct SessionResponse {
    success: bool,
}

/// Exchange a Google ID token for a session cookie.
async fn session_login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(body): Json<SessionLoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let user = state
        .google_verifier
        .verify_id_token(&body.id_token)
        .await
        .map_err(map_oidc_error)?;

    upsert_signed_in_profile(&state, &user).await?;

    let jwt = create_session_jwt(&user.subject, &state.config.session_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Session creation failed: {}", e)))?;

    let jar = jar.add(session_cookie(jwt, is_secure_host(&headers)));

    Ok((jar, Json(SessionResponse { success: true })))
}

#[derive(Serialize)]
struct SessionCheckResponse {
    signed_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    uid: Option<String>,
}

/// Report whether the caller has a valid session.
async fn session_check(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Json<SessionCheckResponse> {
    let uid = extract_session_token(&jar, &headers)
        .and_then(|token| verify_session_token(&token, &state.config.session_signing_key));

    Json(SessionCheckResponse {
        signed_in: uid.is_some(),
        uid,
    })
}

/// Clear the session cookie.
async fn logout(jar: CookieJar) -> (CookieJar, Json<SessionResponse>) {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::ZERO);

    (jar.add(cookie), Json(SessionResponse { success: true }))
}

// ─── Helpers ─────────────────────────────────────────────────

/// Upsert the user's profile after a verified sign-in, preserving fields
/// the user has edited themselves.
async fn upsert_signed_in_profile(
    state: &Arc<AppState>,
    user: &VerifiedGoogleUser,
) -> Result<()> {
    let now = now_rfc3339();
    let mut profile = state
        .db
        .get_profile(&user.subject)
        .await?
        .unwrap_or_else(|| UserProfile {
            created_at: now.clone(),
            ..UserProfile::default()
        });

    profile.email = user.email.clone();
    if profile.name.is_empty() {
        if let Some(name) = &user.name {
            profile.name = name.clone();
        }
    }
    if profile.profile_image_url.is_empty() {
        if let Some(picture) = &user.picture {
            profile.profile_image_url = picture.clone();
        }
    }
    profile.updated_at = now;

    state.db.set_profile(&user.subject, &profile).await
}

fn map_oidc_error(err: OidcError) -> AppError {
    match err {
        OidcError::Rejected(msg) => {
            tracing::warn!(reason = %msg, "Rejected Google ID token");
            AppError::InvalidToken
        }
        OidcError::Transient(msg) => AppError::Upstream(msg),
    }
}

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    cookie.set_secure(secure);
    cookie.set_max_age(time::Duration::seconds(SESSION_MAX_AGE_SECONDS));
    cookie
}

/// Base URL of this service, derived from the request's Host header.
fn service_base_url(headers: &HeaderMap) -> String {
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| {
            std::env::var("API_HOST").unwrap_or_else(|_| "localhost:8080".to_string())
        });

    let scheme = if host.contains("localhost") || host.contains("127.0.0.1") {
        "http"
    } else {
        "https"
    };

    format!("{}://{}", scheme, host)
}

fn is_secure_host(headers: &HeaderMap) -> bool {
    service_base_url(headers).starts_with("https")
}

/// Sign a frontend URL + timestamp into an opaque OAuth state parameter.
fn sign_state(frontend_url: &str, secret: &[u8]) -> Result<String> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis();

    // Data payload: "frontend_url|timestamp_hex"
    let state_payload = format!("{}|{:x}", frontend_url, timestamp);

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(state_payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    // "payload|signature_hex", base64url-encoded for the URL.
    let signed_state = format!("{}|{}", state_payload, hex::encode(signature));

    Ok(URL_SAFE_NO_PAD.encode(signed_state.as_bytes()))
}

/// Verify the HMAC signature and decode the frontend URL from the OAuth
/// state parameter.
fn verify_and_decode_state(state: &str, secret: &[u8]) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // Format is "frontend_url|timestamp_hex|signature_hex"
    let parts: Vec<&str> = state_str.splitn(3, '|').collect();
    if parts.len() != 3 {
        return None;
    }

    let frontend_url = parts[0];
    let timestamp_hex = parts[1];
    let signature_hex = parts[2];

    let payload = format!("{}|{}", frontend_url, timestamp_hex);

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());

    let expected_signature = hex::encode(mac.finalize().into_bytes());

    if signature_hex != expected_signature {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    Some(frontend_url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trip() {
        let secret = b"secret_key";
        let frontend_url = "https://example.com";

        let encoded = sign_state(frontend_url, secret).unwrap();
        let result = verify_and_decode_state(&encoded, secret);

        assert_eq!(result, Some(frontend_url.to_string()));
    }

    #[test]
    fn test_verify_and_decode_state_invalid_signature() {
        let secret = b"secret_key";
        let state_data = "https://example.com|abc123|invalid_signature";
        let encoded_state = URL_SAFE_NO_PAD.encode(state_data.as_bytes());

        let result = verify_and_decode_state(&encoded_state, secret);
        assert_eq!(result, None);
    }

    #[test]
    fn test_verify_and_decode_state_wrong_secret() {
        let secret = b"secret_key";
        let encoded = sign_state("https://example.com", secret).unwrap();

        let result = verify_and_decode_state(&encoded, b"wrong_key");
        assert_eq!(result, None);
    }

    #[test]
    fn test_verify_and_decode_state_malformed() {
        let secret = b"secret_key";
        let encoded_state = URL_SAFE_NO_PAD.encode("invalid|format");
        let result = verify_and_decode_state(&encoded_state, secret);
        assert_eq!(result, None);
    }
}
