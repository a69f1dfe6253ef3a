//! User store port for the external record store.
//!
//! The record store (Airtable) is the system of record for user and
//! subscription data. This port defines the three operations the
//! application consumes: lookup by correlation key, partial update by
//! record id, and chat-history insertion.
//!
//! # Design
//!
//! - **Store agnostic**: nothing here names Airtable; tests substitute
//!   in-memory implementations.
//! - **No retries**: a failed call surfaces as an error and the webhook
//!   provider's own redelivery policy covers recovery.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::billing::{SubscriptionStatus, SubscriptionUpdate};

/// Port for the external user record store.
///
/// Implementations are expected to be safe for concurrent use; a single
/// client is constructed at startup and shared across requests.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user record by Clerk user id.
    ///
    /// The correlation key is unique, so at most one record matches.
    async fn find_user_by_clerk_id(
        &self,
        clerk_user_id: &str,
    ) -> Result<Option<UserRecord>, StoreError>;

    /// Apply a partial subscription update to a record by its store id.
    ///
    /// Only the fields present in the update are written; everything else
    /// on the record is left untouched.
    async fn update_subscription(
        &self,
        record_id: &str,
        update: SubscriptionUpdate,
    ) -> Result<UserRecord, StoreError>;

    /// Append one chat message to the chat history table.
    async fn create_chat_message(
        &self,
        message: NewChatMessage,
    ) -> Result<ChatMessageRecord, StoreError>;
}

/// A user record as held in the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Store-internal record identifier (e.g., "recAbc123").
    pub record_id: String,

    /// Clerk user id, the immutable correlation key.
    pub clerk_user_id: String,

    /// Current subscription status.
    pub subscription_status: SubscriptionStatus,

    /// Last-known provider subscription id.
    pub subscription_id: Option<String>,

    /// Last-known plan name.
    pub plan_label: Option<String>,
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A chat message to be persisted.
#[derive(Debug, Clone)]
pub struct NewChatMessage {
    /// Author's Clerk user id.
    pub clerk_user_id: String,

    /// Who wrote the message.
    pub role: ChatRole,

    /// Message text.
    pub content: String,
}

/// A persisted chat message reference.
#[derive(Debug, Clone)]
pub struct ChatMessageRecord {
    /// Store-internal record identifier.
    pub record_id: String,
}

/// Errors from record store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure reaching the store.
    #[error("record store request failed: {0}")]
    Http(String),

    /// The store answered with a non-success status.
    #[error("record store returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The store's response could not be decoded.
    #[error("record store response malformed: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Http(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_role_serializes_lowercase() {
        assert_eq!(ChatRole::User.as_str(), "user");
        assert_eq!(ChatRole::Assistant.as_str(), "assistant");
        assert_eq!(serde_json::to_string(&ChatRole::User).unwrap(), "\"user\"");
    }

    #[test]
    fn store_error_displays_api_status() {
        let err = StoreError::Api {
            status: 422,
            message: "INVALID_VALUE_FOR_COLUMN".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "record store returned 422: INVALID_VALUE_FOR_COLUMN"
        );
    }
}
