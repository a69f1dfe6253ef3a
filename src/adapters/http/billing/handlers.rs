//! HTTP handlers for billing webhooks and chat history.
//!
//! The webhook handler owns the response policy toward the billing
//! provider. The rule is: 401 only for authentication failure, 500 only
//! for faults a redelivery could fix (missing configuration, transient
//! store errors) or for payloads we could not read, and 200 for everything
//! else - including events that were absorbed without a write, because an
//! error status would put them on the provider's retry schedule forever.
//!
//! The raw body must reach signature verification byte-for-byte as
//! received, so the handler extracts `Bytes` and parses JSON only after
//! the digest has been checked.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{ChatMessageRequest, ChatMessageResponse, ErrorResponse};
use crate::application::handlers::billing::{
    RecordChatMessageCommand, RecordChatMessageHandler, SyncOutcome, SyncSubscriptionCommand,
    SyncSubscriptionHandler,
};
use crate::domain::billing::{BillingEvent, SignatureVerifier, WebhookError};
use crate::ports::UserStore;

/// Header carrying the provider's HMAC hex digest.
pub const SIGNATURE_HEADER: &str = "X-Signature";

/// Shared state for billing endpoints.
///
/// Both fields are optional: the server starts even when billing or store
/// credentials are absent, and requests needing them answer 500 until the
/// environment is fixed.
#[derive(Clone)]
pub struct BillingAppState {
    pub verifier: Option<SignatureVerifier>,
    pub user_store: Option<Arc<dyn UserStore>>,
}

/// Handle a billing provider webhook delivery.
///
/// `POST /api/webhooks/lemonsqueezy`
pub async fn handle_billing_webhook(
    State(state): State<BillingAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match process_webhook(&state, &headers, &body).await {
        Ok(outcome) => webhook_success_response(outcome),
        Err(err) => webhook_error_response(err),
    }
}

/// Authenticate, parse, and apply one delivery. Every rejection surfaces
/// as a `WebhookError` so status, body, and log severity all come from the
/// single mapping below.
async fn process_webhook(
    state: &BillingAppState,
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<SyncOutcome, WebhookError> {
    let (Some(verifier), Some(store)) = (&state.verifier, &state.user_store) else {
        return Err(WebhookError::NotConfigured);
    };

    // Authenticate before reading anything out of the payload.
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(WebhookError::MissingSignature)?;

    if !verifier.verify(signature, body) {
        return Err(WebhookError::InvalidSignature);
    }

    // Only authenticated payloads are parsed.
    let event: BillingEvent =
        serde_json::from_slice(body).map_err(|err| WebhookError::ParseError(err.to_string()))?;

    SyncSubscriptionHandler::new(store.clone())
        .handle(SyncSubscriptionCommand { event })
        .await
}

fn webhook_success_response(outcome: SyncOutcome) -> Response {
    match outcome {
        SyncOutcome::Updated {
            clerk_user_id,
            status,
        } => {
            tracing::info!(
                clerk_user_id = %clerk_user_id,
                status = status.as_str(),
                "subscription synchronized"
            );
            (StatusCode::OK, "Webhook processed successfully.").into_response()
        }
        SyncOutcome::Ignored { event_name } => {
            tracing::info!(event_name = %event_name, "acknowledged unhandled event");
            (StatusCode::OK, "Webhook processed successfully.").into_response()
        }
        SyncOutcome::MissingUserRef => (
            StatusCode::OK,
            "Webhook processed, but user identifier was missing.",
        )
            .into_response(),
        SyncOutcome::UnknownUser { .. } => {
            (StatusCode::OK, "User not found in our database.").into_response()
        }
    }
}

/// The one place webhook failures become HTTP. Auth rejections log at warn
/// (expected noise from misconfigured senders); server faults log at error
/// with the retryability flag, since the provider will redeliver those.
fn webhook_error_response(err: WebhookError) -> Response {
    let status = err.status_code();
    if status == StatusCode::UNAUTHORIZED {
        tracing::warn!(error = %err, "billing webhook rejected");
    } else {
        tracing::error!(error = %err, retryable = err.is_retryable(), "webhook processing failed");
    }
    (status, webhook_error_body(&err)).into_response()
}

fn webhook_error_body(err: &WebhookError) -> &'static str {
    match err {
        WebhookError::InvalidSignature | WebhookError::MissingSignature => "Invalid signature",
        WebhookError::NotConfigured => "Server configuration error",
        WebhookError::ParseError(_) | WebhookError::Store(_) => {
            "Internal Server Error while processing webhook."
        }
    }
}

/// Persist one chat message.
///
/// `POST /api/chat/history`
pub async fn record_chat_message(
    State(state): State<BillingAppState>,
    Json(request): Json<ChatMessageRequest>,
) -> Response {
    let Some(store) = &state.user_store else {
        tracing::error!("chat message received but record store is not configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Server configuration error".to_string(),
            }),
        )
            .into_response();
    };

    let handler = RecordChatMessageHandler::new(store.clone());
    match handler
        .handle(RecordChatMessageCommand {
            clerk_user_id: request.clerk_user_id,
            role: request.role,
            content: request.content,
        })
        .await
    {
        Ok(record) => (
            StatusCode::CREATED,
            Json(ChatMessageResponse {
                id: record.record_id,
            }),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to persist chat message");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to save chat message".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_map_to_401_invalid_signature() {
        for err in [WebhookError::MissingSignature, WebhookError::InvalidSignature] {
            assert_eq!(webhook_error_body(&err), "Invalid signature");
            let response = webhook_error_response(err);
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn missing_configuration_maps_to_500_config_error() {
        assert_eq!(
            webhook_error_body(&WebhookError::NotConfigured),
            "Server configuration error"
        );
        let response = webhook_error_response(WebhookError::NotConfigured);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn parse_and_store_failures_map_to_500_internal_error() {
        for err in [
            WebhookError::ParseError("bad shape".to_string()),
            WebhookError::Store("timeout".to_string()),
        ] {
            assert_eq!(
                webhook_error_body(&err),
                "Internal Server Error while processing webhook."
            );
            let response = webhook_error_response(err);
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[tokio::test]
    async fn unconfigured_state_yields_not_configured() {
        let state = BillingAppState {
            verifier: None,
            user_store: None,
        };
        let result = process_webhook(&state, &HeaderMap::new(), &Bytes::new()).await;
        assert!(matches!(result, Err(WebhookError::NotConfigured)));
    }
}
