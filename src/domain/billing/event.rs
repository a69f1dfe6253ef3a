//! Lemon Squeezy webhook event types.
//!
//! Defines the structures for parsing billing webhook payloads.
//! Only fields relevant to our processing are captured; the provider sends
//! far more, which serde ignores.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::status::SubscriptionTransition;

/// Billing webhook event (simplified).
///
/// Shape on the wire:
/// `{ meta: { event_name, custom_data: { clerk_user_id } }, data: { id, attributes: { variant_name } } }`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BillingEvent {
    /// Event metadata, including the lifecycle tag and checkout custom data.
    pub meta: EventMeta,

    /// The subscription object the event refers to.
    pub data: EventData,
}

/// Event metadata block.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventMeta {
    /// Lifecycle tag (e.g., "subscription_created").
    pub event_name: String,

    /// Custom data attached at checkout time. Absent when the checkout was
    /// started without our metadata, which makes the event unprocessable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<CustomData>,
}

/// Checkout custom data carrying our correlation key.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CustomData {
    /// Clerk user id linking the event to an internal user record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clerk_user_id: Option<String>,
}

/// The subscription object attached to the event.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventData {
    /// Provider-assigned subscription identifier. The provider is
    /// inconsistent about sending this as a number or a string.
    pub id: ResourceId,

    /// Subscription attributes.
    pub attributes: EventAttributes,
}

/// Subscription attributes we care about.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventAttributes {
    /// Human-readable plan/variant name (e.g., "Pro").
    pub variant_name: String,
}

/// Provider resource identifier, sent as either a JSON number or string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Number(n) => write!(f, "{}", n),
            ResourceId::Text(s) => f.write_str(s),
        }
    }
}

impl BillingEvent {
    /// The correlation key from event metadata, if present.
    ///
    /// Branches explicitly on each optional layer rather than relying on
    /// silent propagation of missing fields.
    pub fn clerk_user_id(&self) -> Option<&str> {
        self.meta
            .custom_data
            .as_ref()
            .and_then(|data| data.clerk_user_id.as_deref())
    }

    /// Parse the event name into a known lifecycle kind.
    pub fn kind(&self) -> BillingEventKind {
        BillingEventKind::parse(&self.meta.event_name)
    }
}

/// Known Lemon Squeezy subscription lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingEventKind {
    /// Subscription created at checkout.
    Created,
    /// Cancelled subscription resumed before expiry.
    Resumed,
    /// Paused subscription unpaused.
    Unpaused,
    /// Subscription cancelled (remains until period end).
    Cancelled,
    /// Subscription expired.
    Expired,
    /// Subscription payments paused.
    Paused,
    /// Unknown or unhandled event type.
    Unknown,
}

impl BillingEventKind {
    /// Parse an event name string.
    pub fn parse(s: &str) -> Self {
        match s {
            "subscription_created" => Self::Created,
            "subscription_resumed" => Self::Resumed,
            "subscription_unpaused" => Self::Unpaused,
            "subscription_cancelled" => Self::Cancelled,
            "subscription_expired" => Self::Expired,
            "subscription_paused" => Self::Paused,
            _ => Self::Unknown,
        }
    }

    /// Convert to the provider's event name string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "subscription_created",
            Self::Resumed => "subscription_resumed",
            Self::Unpaused => "subscription_unpaused",
            Self::Cancelled => "subscription_cancelled",
            Self::Expired => "subscription_expired",
            Self::Paused => "subscription_paused",
            Self::Unknown => "unknown",
        }
    }

    /// The subscription state change this event drives, if any.
    ///
    /// Unknown events map to `None`: they are acknowledged without mutation
    /// for forward compatibility with new provider event types.
    pub fn transition(&self) -> Option<SubscriptionTransition> {
        match self {
            Self::Created | Self::Resumed | Self::Unpaused => {
                Some(SubscriptionTransition::Activate)
            }
            Self::Cancelled | Self::Expired | Self::Paused => {
                Some(SubscriptionTransition::Deactivate)
            }
            Self::Unknown => None,
        }
    }
}
