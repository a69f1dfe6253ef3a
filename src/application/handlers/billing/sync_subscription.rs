//! SyncSubscriptionHandler - Command handler applying one billing event to a
//! user record.
//!
//! Runs after the HTTP layer has already verified the delivery signature:
//! every event reaching this handler is authentic. The handler's job is
//! identity resolution and the state transition, plus the absorption policy
//! for events that can never be completed (missing correlation key, unknown
//! user, unrecognized event name). Absorbed events are successes, not
//! errors: an error response would make the provider redeliver a webhook
//! that will fail identically every time.

use std::sync::Arc;

use crate::domain::billing::{
    BillingEvent, SubscriptionStatus, SubscriptionTransition, SubscriptionUpdate, WebhookError,
};
use crate::ports::UserStore;

/// Command to synchronize one parsed, authenticated billing event.
#[derive(Debug, Clone)]
pub struct SyncSubscriptionCommand {
    pub event: BillingEvent,
}

/// Result of processing one billing event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The user record was updated.
    Updated {
        clerk_user_id: String,
        status: SubscriptionStatus,
    },
    /// Event metadata carried no correlation key; absorbed without mutation.
    MissingUserRef,
    /// No record matches the correlation key; absorbed without mutation.
    UnknownUser { clerk_user_id: String },
    /// Event name is outside the known lifecycle set; acknowledged as a
    /// no-op for forward compatibility.
    Ignored { event_name: String },
}

/// Handler applying billing events to the user record store.
pub struct SyncSubscriptionHandler {
    store: Arc<dyn UserStore>,
}

impl SyncSubscriptionHandler {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: SyncSubscriptionCommand,
    ) -> Result<SyncOutcome, WebhookError> {
        let event = cmd.event;
        let event_name = event.meta.event_name.clone();

        // 1. Correlation key. An authentic event without one can never be
        //    matched to a user, so it is absorbed rather than retried.
        let clerk_user_id = match event.clerk_user_id() {
            Some(id) => id.to_string(),
            None => {
                tracing::warn!(
                    event_name = %event_name,
                    "webhook processed, but no clerk_user_id found in custom_data"
                );
                return Ok(SyncOutcome::MissingUserRef);
            }
        };

        // 2. Resolve the internal record.
        let record = self
            .store
            .find_user_by_clerk_id(&clerk_user_id)
            .await
            .map_err(|err| WebhookError::Store(err.to_string()))?;

        let Some(record) = record else {
            tracing::error!(
                clerk_user_id = %clerk_user_id,
                event_name = %event_name,
                "webhook received for an unknown user; absorbing to stop retries"
            );
            return Ok(SyncOutcome::UnknownUser { clerk_user_id });
        };

        // 3. Map the event to a state transition.
        let update = match event.kind().transition() {
            Some(SubscriptionTransition::Activate) => SubscriptionUpdate::activate(
                event.data.id.to_string(),
                event.data.attributes.variant_name.clone(),
            ),
            Some(SubscriptionTransition::Deactivate) => SubscriptionUpdate::deactivate(),
            None => {
                tracing::info!(
                    event_name = %event_name,
                    "received a webhook for an unhandled event"
                );
                return Ok(SyncOutcome::Ignored { event_name });
            }
        };

        // 4. Write the new state. This is the last step, so a failure here
        //    never leaves partial work behind.
        let status = update.status;
        tracing::info!(
            clerk_user_id = %clerk_user_id,
            status = status.as_str(),
            "applying subscription update"
        );
        self.store
            .update_subscription(&record.record_id, update)
            .await
            .map_err(|err| WebhookError::Store(err.to_string()))?;

        Ok(SyncOutcome::Updated {
            clerk_user_id,
            status,
        })
    }
}
