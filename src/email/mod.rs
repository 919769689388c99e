//! Email Notifications
//!
//! One transactional email per quote request, sent through the provider's
//! HTTP API. No retries and no delivery tracking.
//!
//! - [`EmailSender`]: capability trait over the provider
//! - [`ResendClient`]: Resend REST client
//! - [`template`]: fixed HTML template for the quote notification

mod resend;
pub mod template;

pub use resend::{ResendClient, ResendConfig};
pub use template::{format_currency, quote_email, render_quote_email, QuoteEmailFields};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use thiserror::Error;

/// Outbound email
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

/// Provider acknowledgement, returned to callers under `data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailReceipt {
    pub id: String,
}

/// Error reported by the provider itself, returned to callers under `error`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderError {
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
}

/// Errors from sending email
#[derive(Debug, Error)]
pub enum EmailError {
    /// The provider answered and rejected the message
    #[error("Email provider rejected message: {} ({})", .0.message, .0.name)]
    Provider(ProviderError),

    /// The provider could not be reached
    #[error("Email request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The notification body could not be rendered
    #[error("Email template error: {0}")]
    Template(#[from] tera::Error),

    /// Anything else
    #[error("Unexpected email failure: {0}")]
    Unexpected(String),
}

/// Transactional email provider
#[async_trait]
pub trait EmailSender: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError>;
}

/// Sender that keeps messages in memory instead of delivering them.
///
/// Used when no provider key is configured in development, and by tests.
#[derive(Default)]
pub struct OutboxSender {
    sent: Mutex<Vec<EmailMessage>>,
    reject_with: Mutex<Option<ProviderError>>,
}

impl OutboxSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every following message with this provider error
    pub fn reject_with(&self, error: ProviderError) {
        if let Ok(mut slot) = self.reject_with.lock() {
            *slot = Some(error);
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl EmailSender for OutboxSender {
    fn name(&self) -> &'static str {
        "outbox"
    }

    async fn send(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        let rejection = self
            .reject_with
            .lock()
            .map_err(|e| EmailError::Unexpected(e.to_string()))?
            .clone();
        if let Some(error) = rejection {
            return Err(EmailError::Provider(error));
        }

        let mut sent = self
            .sent
            .lock()
            .map_err(|e| EmailError::Unexpected(e.to_string()))?;
        sent.push(message);

        Ok(EmailReceipt {
            id: format!("outbox-{}", sent.len()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> EmailMessage {
        EmailMessage {
            from: "quotes@coverwise.test".to_string(),
            to: vec!["agents@coverwise.test".to_string()],
            subject: "New quote".to_string(),
            html: "<p>hi</p>".to_string(),
            reply_to: None,
        }
    }

    #[tokio::test]
    async fn test_outbox_records_messages() {
        let outbox = OutboxSender::new();
        let receipt = outbox.send(message()).await.unwrap();
        assert_eq!(receipt.id, "outbox-1");
        assert_eq!(outbox.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_outbox_rejection() {
        let outbox = OutboxSender::new();
        outbox.reject_with(ProviderError {
            status_code: Some(422),
            name: "validation_error".to_string(),
            message: "Invalid `to` field".to_string(),
        });

        let err = outbox.send(message()).await.unwrap_err();
        assert!(matches!(err, EmailError::Provider(ref e) if e.name == "validation_error"));
        assert!(outbox.sent().is_empty());
    }

    #[test]
    fn test_message_serialization_skips_empty_reply_to() {
        let json = serde_json::to_value(message()).unwrap();
        assert!(json.get("reply_to").is_none());
        assert_eq!(json["to"][0], "agents@coverwise.test");
    }
}
