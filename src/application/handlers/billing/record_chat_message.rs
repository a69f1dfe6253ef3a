//! RecordChatMessageHandler - Command handler appending a chat message to
//! the persistent history table.

use std::sync::Arc;

use crate::ports::{ChatMessageRecord, ChatRole, NewChatMessage, StoreError, UserStore};

/// Command to persist one chat message.
#[derive(Debug, Clone)]
pub struct RecordChatMessageCommand {
    pub clerk_user_id: String,
    pub role: ChatRole,
    pub content: String,
}

/// Handler writing chat messages through the user store.
pub struct RecordChatMessageHandler {
    store: Arc<dyn UserStore>,
}

impl RecordChatMessageHandler {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: RecordChatMessageCommand,
    ) -> Result<ChatMessageRecord, StoreError> {
        let record = self
            .store
            .create_chat_message(NewChatMessage {
                clerk_user_id: cmd.clerk_user_id,
                role: cmd.role,
                content: cmd.content,
            })
            .await?;

        tracing::debug!(record_id = %record.record_id, "chat message persisted");
        Ok(record)
    }
}
