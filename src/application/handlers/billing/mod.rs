//! Billing command handlers.

mod record_chat_message;
mod sync_subscription;

pub use record_chat_message::{RecordChatMessageCommand, RecordChatMessageHandler};
pub use sync_subscription::{SyncOutcome, SyncSubscriptionCommand, SyncSubscriptionHandler};
