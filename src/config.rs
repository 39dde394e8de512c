//! Application configuration loaded from environment variables.
//!
//! Secrets are injected as environment variables (Cloud Run secret
//! bindings) and cached in memory for the lifetime of the process.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Google OAuth client ID (public)
    pub google_client_id: String,
    /// Frontend URL for OAuth redirects and CORS
    pub frontend_url: String,
    /// Public base URL of this API (used in the sitemap)
    pub site_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,

    // --- Secrets (from env / secret bindings) ---
    /// Google OAuth client secret
    pub google_client_secret: String,
    /// Google Maps geocoding API key
    pub google_maps_api_key: String,
    /// newsdata.io API key
    pub newsdata_api_key: String,
    /// EmailJS credentials for the contact form
    pub emailjs_service_id: String,
    pub emailjs_template_id: String,
    pub emailjs_public_key: String,
    pub emailjs_private_key: String,
    /// JWT signing key for session tokens (raw bytes)
    pub session_signing_key: Vec<u8>,
    /// HMAC key for signing OAuth state parameters
    pub oauth_state_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            google_client_id: env::var("GOOGLE_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_ID"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            site_url: env::var("SITE_URL")
                .unwrap_or_else(|_| "https://www.thehumorhub.com".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),

            google_client_secret: env::var("GOOGLE_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_SECRET"))?,
            google_maps_api_key: env::var("GOOGLE_MAPS_API_KEY")
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            newsdata_api_key: env::var("NEWSDATA_API_KEY")
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            emailjs_service_id: env::var("EMAILJS_SERVICE_ID").unwrap_or_default(),
            emailjs_template_id: env::var("EMAILJS_TEMPLATE_ID").unwrap_or_default(),
            emailjs_public_key: env::var("EMAILJS_PUBLIC_KEY").unwrap_or_default(),
            emailjs_private_key: env::var("EMAILJS_PRIVATE_KEY").unwrap_or_default(),
            session_signing_key: env::var("SESSION_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("SESSION_SIGNING_KEY"))?
                .into_bytes(),
            oauth_state_key: env::var("OAUTH_STATE_KEY")
                .map_err(|_| ConfigError::Missing("OAUTH_STATE_KEY"))?
                .into_bytes(),
        })
    }

    /// Default config for tests. Never used in production.
    pub fn test_default() -> Self {
        Self {
            google_client_id: "test-client-id.apps.googleusercontent.com".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            site_url: "https://www.thehumorhub.com".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            google_client_secret: "test_secret".to_string(),
            google_maps_api_key: "test_maps_key".to_string(),
            newsdata_api_key: "test_news_key".to_string(),
            emailjs_service_id: "service_test".to_string(),
            emailjs_template_id: "template_test".to_string(),
            emailjs_public_key: "public_test".to_string(),
            emailjs_private_key: "private_test".to_string(),
            session_signing_key: b"test_session_key_32_bytes_min!!".to_vec(),
            oauth_state_key: b"test_state_key".to_vec(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
