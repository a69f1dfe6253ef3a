//! Subscription status state machine.
//!
//! `subscription_status` is a three-state field overwritten by whichever
//! event was processed most recently. There are no transition guards: the
//! store's last-write-wins semantics decide the final state, and re-applying
//! a state a record already holds is a no-op in effect.

use serde::{Deserialize, Serialize};

/// Subscription status of a user record.
///
/// `Cancelled` is the umbrella state for cancelled, expired, and paused
/// subscriptions; the distinction is not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    /// Never subscribed (the state records start in at sign-up).
    None,
    /// Subscription is active and paid.
    Active,
    /// Subscription cancelled, expired, or paused.
    Cancelled,
}

impl SubscriptionStatus {
    /// The string form persisted in the record store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Active => "active",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse a persisted status value; anything unrecognized reads as `None`.
    pub fn parse(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            "cancelled" => Self::Cancelled,
            _ => Self::None,
        }
    }
}

/// Direction of a subscription state change driven by one event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionTransition {
    /// created / resumed / unpaused: the subscription is in good standing.
    Activate,
    /// cancelled / expired / paused: access should lapse.
    Deactivate,
}

/// The exact field set written to a user record for one transition.
///
/// `None` fields are left untouched in the store, so a deactivation keeps
/// the last-known subscription id and plan on the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionUpdate {
    /// New subscription status.
    pub status: SubscriptionStatus,

    /// Provider subscription id, written only on activation.
    pub subscription_id: Option<String>,

    /// Plan/variant name, written only on activation.
    pub plan_label: Option<String>,
}

impl SubscriptionUpdate {
    /// Update for an activation event: status plus provider identifiers.
    pub fn activate(subscription_id: impl Into<String>, plan_label: impl Into<String>) -> Self {
        Self {
            status: SubscriptionStatus::Active,
            subscription_id: Some(subscription_id.into()),
            plan_label: Some(plan_label.into()),
        }
    }

    /// Update for a deactivation event: status only.
    pub fn deactivate() -> Self {
        Self {
            status: SubscriptionStatus::Cancelled,
            subscription_id: None,
            plan_label: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            SubscriptionStatus::None,
            SubscriptionStatus::Active,
            SubscriptionStatus::Cancelled,
        ] {
            assert_eq!(SubscriptionStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn unrecognized_status_reads_as_none() {
        assert_eq!(
            SubscriptionStatus::parse("past_due"),
            SubscriptionStatus::None
        );
        assert_eq!(SubscriptionStatus::parse(""), SubscriptionStatus::None);
    }

    #[test]
    fn activate_writes_all_three_fields() {
        let update = SubscriptionUpdate::activate("42", "Pro");

        assert_eq!(update.status, SubscriptionStatus::Active);
        assert_eq!(update.subscription_id.as_deref(), Some("42"));
        assert_eq!(update.plan_label.as_deref(), Some("Pro"));
    }

    #[test]
    fn deactivate_writes_status_only() {
        let update = SubscriptionUpdate::deactivate();

        assert_eq!(update.status, SubscriptionStatus::Cancelled);
        assert!(update.subscription_id.is_none());
        assert!(update.plan_label.is_none());
    }

    #[test]
    fn reapplying_an_update_is_identical() {
        // Idempotency by construction: the same event always produces the
        // same field set, so a provider redelivery cannot change the result.
        assert_eq!(
            SubscriptionUpdate::activate("42", "Pro"),
            SubscriptionUpdate::activate("42", "Pro")
        );
        assert_eq!(
            SubscriptionUpdate::deactivate(),
            SubscriptionUpdate::deactivate()
        );
    }
}
