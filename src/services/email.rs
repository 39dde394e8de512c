// SPDX-License-Identifier: MIT

//! EmailJS relay for the contact form.

use serde_json::json;
use std::time::Duration;

use crate::error::AppError;

const EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends contact-form messages through EmailJS.
#[derive(Clone)]
pub struct EmailService {
    client: reqwest::Client,
    service_id: String,
    template_id: String,
    public_key: String,
    private_key: String,
}

impl EmailService {
    pub fn new(
        service_id: &str,
        template_id: &str,
        public_key: &str,
        private_key: &str,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            service_id: service_id.to_string(),
            template_id: template_id.to_string(),
            public_key: public_key.to_string(),
            private_key: private_key.to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.service_id.is_empty()
            && !self.template_id.is_empty()
            && !self.public_key.is_empty()
            && !self.private_key.is_empty()
    }

    /// Relay a contact-form message.
    pub async fn send_contact(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<(), AppError> {
        let payload = json!({
            "service_id": self.service_id,
            "template_id": self.template_id,
            "user_id": self.public_key,
            "accessToken": self.private_key,
            "template_params": {
                "name": name,
                "email": email,
                "message": message,
            },
        });

        let response = self
            .client
            .post(EMAILJS_ENDPOINT)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Email send failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let details = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, details = %details, "EmailJS send failed");
            return Err(AppError::Upstream("Failed to send message".to_string()));
        }

        Ok(())
    }
}
