// SPDX-License-Identifier: MIT

//! Session authentication middleware.
//!
//! Sessions are HS256 JWTs minted after Google sign-in, carried in the
//! `hh_session` cookie (or a bearer header for API clients).

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "hh_session";

/// Session lifetime: seven days.
pub const SESSION_MAX_AGE_SECONDS: i64 = 7 * 24 * 60 * 60;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (Google account subject id)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from the session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
}

/// Pull the session token from the cookie jar or the Authorization header.
pub fn extract_session_token(jar: &CookieJar, headers: &axum::http::HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}

/// Verify a session token and return the user id it names.
pub fn verify_session_token(token: &str, signing_key: &[u8]) -> Option<String> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(token, &key, &validation).ok()?;

    let uid = token_data.claims.sub;
    if uid.is_empty() {
        return None;
    }
    Some(uid)
}

/// Middleware that requires a valid session.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token =
        extract_session_token(&jar, request.headers()).ok_or(StatusCode::UNAUTHORIZED)?;

    let uid = verify_session_token(&token, &state.config.session_signing_key)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(AuthUser { uid });

    Ok(next.run(request).await)
}

/// Create a session JWT for a signed-in user.
pub fn create_session_jwt(uid: &str, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: uid.to_string(),
        iat: now,
        exp: now + SESSION_MAX_AGE_SECONDS as usize,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_round_trip() {
        let key = b"test_session_key_32_bytes_min!!";
        let token = create_session_jwt("google-sub-123", key).unwrap();

        assert_eq!(
            verify_session_token(&token, key),
            Some("google-sub-123".to_string())
        );
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = create_session_jwt("uid", b"key_one_32_bytes_long_exactly!!").unwrap();
        assert_eq!(
            verify_session_token(&token, b"key_two_32_bytes_long_exactly!!"),
            None
        );
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert_eq!(verify_session_token("not.a.jwt", b"key"), None);
    }
}
