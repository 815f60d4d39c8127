//! Webhook error types for gateway webhook handling.
//!
//! Status codes drive the gateway's redelivery: 4xx responses are final,
//! 5xx responses are retried.

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::DomainError;

/// Errors that occur during webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The shared webhook secret is not configured.
    #[error("Webhook secret not configured")]
    MissingSecret,

    /// The signature header is absent or empty.
    #[error("Missing signature")]
    MissingSignature,

    /// Signature verification failed. The reason is never reported.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The verified body is not a valid event.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A persistence call failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl WebhookError {
    /// Returns true if the gateway should redeliver this webhook.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::Storage(_) | WebhookError::MissingSecret)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature
            | WebhookError::InvalidSignature
            | WebhookError::ParseError(_) => StatusCode::BAD_REQUEST,

            WebhookError::MissingSecret | WebhookError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<DomainError> for WebhookError {
    fn from(err: DomainError) -> Self {
        WebhookError::Storage(err.to_string())
    }
}
