//! HTTP adapter for billing webhooks and chat history.

mod dto;
mod handlers;
mod routes;

pub use handlers::{BillingAppState, SIGNATURE_HEADER};
pub use routes::{api_router, chat_routes, webhook_routes};
