//! Request/response DTOs for billing and chat endpoints.

use serde::{Deserialize, Serialize};

use crate::ports::ChatRole;

/// Request body for persisting a chat message.
#[derive(Debug, Deserialize)]
pub struct ChatMessageRequest {
    pub clerk_user_id: String,
    pub role: ChatRole,
    pub content: String,
}

/// Response body after persisting a chat message.
#[derive(Debug, Serialize)]
pub struct ChatMessageResponse {
    pub id: String,
}

/// Generic error body for JSON endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
