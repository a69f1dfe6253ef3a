//! Billing domain module.
//!
//! Handles webhook authenticity and the subscription lifecycle state machine.
//!
//! # Module Structure
//!
//! - `signature` - HMAC-SHA256 webhook signature verification
//! - `event` - provider webhook payload schema and lifecycle kinds
//! - `status` - SubscriptionStatus state machine and field updates
//! - `errors` - webhook error taxonomy with HTTP status mapping

mod errors;
mod event;
mod signature;
mod status;

pub use errors::WebhookError;
pub use event::{
    BillingEvent, BillingEventKind, CustomData, EventAttributes, EventData, EventMeta, ResourceId,
};
pub use signature::SignatureVerifier;
pub use status::{SubscriptionStatus, SubscriptionTransition, SubscriptionUpdate};
