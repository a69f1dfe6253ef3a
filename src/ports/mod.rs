//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `UserStore` - the external keyed record store (users + chat history)

mod user_store;

pub use user_store::{
    ChatMessageRecord, ChatRole, NewChatMessage, StoreError, UserRecord, UserStore,
};
