//! Resend REST Client

use async_trait::async_trait;
use reqwest::Client;

use super::{EmailError, EmailMessage, EmailReceipt, EmailSender, ProviderError};

/// Configuration for the Resend client
#[derive(Debug, Clone)]
pub struct ResendConfig {
    pub api_key: String,
    /// API base URL (e.g., "https://api.resend.com")
    pub base_url: String,
    pub request_timeout_ms: u64,
}

impl ResendConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.resend.com".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

pub struct ResendClient {
    client: Client,
    config: ResendConfig,
}

impl ResendClient {
    pub fn new(config: ResendConfig) -> Result<Self, EmailError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }
}

/// Turn a non-success response body into a provider error
fn provider_error(status: u16, body: &str) -> ProviderError {
    match serde_json::from_str::<ProviderError>(body) {
        Ok(mut error) => {
            error.status_code.get_or_insert(status);
            error
        }
        Err(_) => ProviderError {
            status_code: Some(status),
            name: "application_error".to_string(),
            message: body.to_string(),
        },
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    fn name(&self) -> &'static str {
        "resend"
    }

    async fn send(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        let url = format!("{}/emails", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let receipt: EmailReceipt = response.json().await?;
            tracing::info!(email_id = %receipt.id, subject = %message.subject, "Email sent");
            Ok(receipt)
        } else {
            let body = response.text().await.unwrap_or_default();
            let error = provider_error(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), name = %error.name, message = %error.message, "Email provider rejected message");
            Err(EmailError::Provider(error))
        }
    }
}
