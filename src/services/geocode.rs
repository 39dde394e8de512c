// SPDX-License-Identifier: MIT

//! Google Maps geocoding client for event submissions.

use serde::Deserialize;
use std::time::Duration;

use crate::error::AppError;
use crate::models::LatLng;

const GEOCODE_API_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin client for the Google Maps geocoding API.
#[derive(Clone)]
pub struct GeocodeService {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Option<GeocodeGeometry>,
}

#[derive(Debug, Deserialize)]
struct GeocodeGeometry {
    location: Option<LatLng>,
}

impl GeocodeService {
    pub fn new(api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: api_key.to_string(),
        }
    }

    /// Resolve a free-text address to coordinates.
    pub async fn geocode_address(&self, address: &str) -> Result<LatLng, AppError> {
        if self.api_key.is_empty() {
            return Err(AppError::Upstream(
                "Geocoding API key not configured".to_string(),
            ));
        }

        let response = self
            .client
            .get(GEOCODE_API_URL)
            .query(&[("key", self.api_key.as_str()), ("address", address)])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Geocoding request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Geocoding failed ({})",
                response.status()
            )));
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid geocoding response: {e}")))?;

        if body.status == "OK" {
            if let Some(location) = body
                .results
                .into_iter()
                .next()
                .and_then(|r| r.geometry)
                .and_then(|g| g.location)
            {
                return Ok(location);
            }
        }

        Err(AppError::Upstream(
            body.error_message
                .unwrap_or_else(|| "No geocoding results".to_string()),
        ))
    }
}
