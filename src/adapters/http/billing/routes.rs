//! Axum router configuration for billing and chat endpoints.

use axum::{routing::post, Router};

use super::handlers::{handle_billing_webhook, record_chat_message, BillingAppState};

/// Create the webhook router.
///
/// Webhook endpoints carry no user authentication; deliveries are
/// authenticated by signature inside the handler.
///
/// # Routes
/// - `POST /lemonsqueezy` - Handle Lemon Squeezy webhooks
pub fn webhook_routes() -> Router<BillingAppState> {
    Router::new().route("/lemonsqueezy", post(handle_billing_webhook))
}

/// Create the chat history router.
///
/// # Routes
/// - `POST /history` - Append one chat message
pub fn chat_routes() -> Router<BillingAppState> {
    Router::new().route("/history", post(record_chat_message))
}

/// Create the complete API router, suitable for mounting at `/api`.
pub fn api_router() -> Router<BillingAppState> {
    Router::new()
        .nest("/webhooks", webhook_routes())
        .nest("/chat", chat_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> BillingAppState {
        BillingAppState {
            verifier: None,
            user_store: None,
        }
    }

    #[test]
    fn webhook_routes_creates_router() {
        let router = webhook_routes();
        let _: Router<()> = router.with_state(test_state());
    }

    #[test]
    fn chat_routes_creates_router() {
        let router = chat_routes();
        let _: Router<()> = router.with_state(test_state());
    }

    #[test]
    fn api_router_creates_combined_router() {
        let router = api_router();
        let _: Router<()> = router.with_state(test_state());
    }
}
