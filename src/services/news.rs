// SPDX-License-Identifier: MIT

//! newsdata.io client backing the news page.

use std::time::Duration;

use crate::error::AppError;

const NEWS_API_URL: &str = "https://newsdata.io/api/1/news";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin client for the newsdata.io aggregation API.
#[derive(Clone)]
pub struct NewsService {
    client: reqwest::Client,
    api_key: String,
}

impl NewsService {
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

    /// Fetch headlines for a category with an optional search query.
    /// Returns the provider's `results` array untouched; the frontend
    /// renders the articles as-is.
    pub async fn fetch_headlines(
        &self,
        category: &str,
        query: Option<&str>,
    ) -> Result<serde_json::Value, AppError> {
        if self.api_key.is_empty() {
            return Err(AppError::Upstream("News API key not configured".to_string()));
        }

        let mut params = vec![
            ("apikey", self.api_key.as_str()),
            ("category", category),
        ];
        if let Some(q) = query.filter(|q| !q.is_empty()) {
            params.push(("q", q));
        }

        let response = self
            .client
            .get(NEWS_API_URL)
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("News request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "News API returned status {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid news response: {e}")))?;

        Ok(body
            .get("results")
            .cloned()
            .unwrap_or(serde_json::Value::Array(vec![])))
    }
}
