//! Webhook error types for billing webhook handling.
//!
//! Defines the error conditions that can occur during webhook processing,
//! with HTTP status code mapping. Status codes drive the provider's retry
//! behavior: 401 and 500 responses get redelivered, 200 responses do not.
//!
//! Absorbed events (missing correlation key, unknown user, unrecognized
//! event name) are deliberately NOT errors: they are acknowledged with 200
//! so the provider stops retrying a delivery that can never succeed.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur during webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signature header was absent from the request.
    #[error("Missing signature header")]
    MissingSignature,

    /// Required server configuration (signing secret, store credentials)
    /// is absent; nothing was attempted.
    #[error("Server configuration error")]
    NotConfigured,

    /// Failed to parse a signature-verified payload. By this point the
    /// sender is trusted, so this indicates an unexpected payload shape,
    /// not hostile input.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Record store operation failed.
    #[error("Record store error: {0}")]
    Store(String),
}

impl WebhookError {
    /// Maps the error to the HTTP status the provider should see.
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Auth failures: fail closed, no retry expected to help
            WebhookError::InvalidSignature | WebhookError::MissingSignature => {
                StatusCode::UNAUTHORIZED
            }

            // Server-side problems: provider retries may recover these
            WebhookError::NotConfigured
            | WebhookError::ParseError(_)
            | WebhookError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns true if a provider redelivery could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebhookError::NotConfigured | WebhookError::Store(_)
        )
    }
}
