//! Airtable Client - Implementation of UserStore against the Airtable REST API.
//!
//! One base holds both tables: the user table keyed by `clerk_id` and the
//! chat history table. Lookups use `filterByFormula`, writes use partial
//! PATCH so untouched fields keep their values.
//!
//! # Wire field names
//!
//! The Airtable columns predate this service and are fixed:
//! `clerk_id`, `subscription_status`, `lemon_squeezy_subscription_id`,
//! `plan_name` on the user table; `clerk_id`, `role`, `content`,
//! `timestamp` on the chat table.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AirtableConfig;
use crate::domain::billing::{SubscriptionStatus, SubscriptionUpdate};
use crate::ports::{ChatMessageRecord, NewChatMessage, StoreError, UserRecord, UserStore};

/// Airtable REST API root.
const DEFAULT_BASE_URL: &str = "https://api.airtable.com/v0";

/// Airtable-backed implementation of `UserStore`.
pub struct AirtableClient {
    api_key: Secret<String>,
    base_url: String,
    base_id: String,
    users_table: String,
    chat_table: String,
    client: Client,
}

impl AirtableClient {
    /// Creates a client from validated configuration.
    pub fn new(config: &AirtableConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key: Secret::new(config.api_key.clone()),
            base_url: DEFAULT_BASE_URL.to_string(),
            base_id: config.base_id.clone(),
            users_table: config.users_table.clone(),
            chat_table: config.chat_table.clone(),
            client,
        }
    }

    /// Overrides the API root (for tests against a local server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.base_id, table)
    }

    fn record_url(&self, table: &str, record_id: &str) -> String {
        format!("{}/{}", self.table_url(table), record_id)
    }

    /// Maps a non-success response to `StoreError::Api` with the body text
    /// preserved for diagnostics.
    async fn check_status(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, StoreError> {
        response
            .json::<T>()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()))
    }
}

/// Builds the `filterByFormula` expression for a lookup by Clerk id.
///
/// The id lands inside a double-quoted formula string literal, so embedded
/// backslashes and quotes must be escaped or the formula breaks (Clerk ids
/// are alphanumeric in practice, but the store query must not trust that).
fn clerk_id_formula(clerk_user_id: &str) -> String {
    let escaped = clerk_user_id.replace('\\', "\\\\").replace('"', "\\\"");
    format!("{{clerk_id}} = \"{escaped}\"")
}

#[async_trait]
impl UserStore for AirtableClient {
    async fn find_user_by_clerk_id(
        &self,
        clerk_user_id: &str,
    ) -> Result<Option<UserRecord>, StoreError> {
        let formula = clerk_id_formula(clerk_user_id);
        let response = self
            .client
            .get(self.table_url(&self.users_table))
            .bearer_auth(self.api_key.expose_secret())
            .query(&[("filterByFormula", formula.as_str()), ("maxRecords", "1")])
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let list: RecordList<UserFields> = Self::decode(response).await?;

        Ok(list.records.into_iter().next().map(UserRecord::from))
    }

    async fn update_subscription(
        &self,
        record_id: &str,
        update: SubscriptionUpdate,
    ) -> Result<UserRecord, StoreError> {
        let body = UpdateRequest {
            fields: UserFieldsPatch {
                subscription_status: update.status.as_str(),
                lemon_squeezy_subscription_id: update.subscription_id,
                plan_name: update.plan_label,
            },
        };

        let response = self
            .client
            .patch(self.record_url(&self.users_table, record_id))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let record: AirtableRecord<UserFields> = Self::decode(response).await?;

        Ok(UserRecord::from(record))
    }

    async fn create_chat_message(
        &self,
        message: NewChatMessage,
    ) -> Result<ChatMessageRecord, StoreError> {
        let body = CreateRequest {
            fields: ChatFields {
                clerk_id: message.clerk_user_id,
                role: message.role.as_str().to_string(),
                content: message.content,
                timestamp: Utc::now().to_rfc3339(),
            },
        };

        let response = self
            .client
            .post(self.table_url(&self.chat_table))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let record: AirtableRecord<ChatFields> = Self::decode(response).await?;

        Ok(ChatMessageRecord {
            record_id: record.id,
        })
    }
}

// ══════════════════════════════════════════════════════════════
// Wire types
// ══════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct RecordList<F> {
    #[serde(default = "Vec::new")]
    records: Vec<AirtableRecord<F>>,
}

#[derive(Debug, Deserialize)]
struct AirtableRecord<F> {
    id: String,
    fields: F,
}

/// User table columns as stored in Airtable.
#[derive(Debug, Deserialize)]
struct UserFields {
    #[serde(default)]
    clerk_id: String,
    #[serde(default)]
    subscription_status: Option<String>,
    #[serde(default)]
    lemon_squeezy_subscription_id: Option<String>,
    #[serde(default)]
    plan_name: Option<String>,
}

impl From<AirtableRecord<UserFields>> for UserRecord {
    fn from(record: AirtableRecord<UserFields>) -> Self {
        Self {
            record_id: record.id,
            clerk_user_id: record.fields.clerk_id,
            subscription_status: record
                .fields
                .subscription_status
                .as_deref()
                .map(SubscriptionStatus::parse)
                .unwrap_or(SubscriptionStatus::None),
            subscription_id: record.fields.lemon_squeezy_subscription_id,
            plan_label: record.fields.plan_name,
        }
    }
}

#[derive(Debug, Serialize)]
struct UpdateRequest {
    fields: UserFieldsPatch,
}

/// Partial update body. `None` fields are omitted entirely so Airtable
/// leaves those columns untouched.
#[derive(Debug, Serialize)]
struct UserFieldsPatch {
    subscription_status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    lemon_squeezy_subscription_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateRequest {
    fields: ChatFields,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatFields {
    clerk_id: String,
    role: String,
    content: String,
    timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ChatRole;

    fn test_client() -> AirtableClient {
        let config = AirtableConfig {
            api_key: "pat_test".to_string(),
            base_id: "appTEST123".to_string(),
            ..Default::default()
        };
        AirtableClient::new(&config)
    }

    #[test]
    fn urls_include_base_and_table() {
        let client = test_client();
        assert_eq!(
            client.table_url("Users"),
            "https://api.airtable.com/v0/appTEST123/Users"
        );
        assert_eq!(
            client.record_url("Users", "recAbc"),
            "https://api.airtable.com/v0/appTEST123/Users/recAbc"
        );
    }

    #[test]
    fn lookup_formula_quotes_the_id() {
        assert_eq!(
            clerk_id_formula("user_2abc"),
            r#"{clerk_id} = "user_2abc""#
        );
    }

    #[test]
    fn lookup_formula_escapes_quotes_and_backslashes() {
        assert_eq!(
            clerk_id_formula(r#"user_"x""#),
            r#"{clerk_id} = "user_\"x\"""#
        );
        assert_eq!(
            clerk_id_formula(r"user_\x"),
            r#"{clerk_id} = "user_\\x""#
        );
    }

    #[test]
    fn base_url_override_applies() {
        let client = test_client().with_base_url("http://127.0.0.1:9999");
        assert_eq!(
            client.table_url("Users"),
            "http://127.0.0.1:9999/appTEST123/Users"
        );
    }

    #[test]
    fn activation_patch_serializes_all_fields() {
        let body = UpdateRequest {
            fields: UserFieldsPatch {
                subscription_status: "active",
                lemon_squeezy_subscription_id: Some("42".to_string()),
                plan_name: Some("Pro".to_string()),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "fields": {
                    "subscription_status": "active",
                    "lemon_squeezy_subscription_id": "42",
                    "plan_name": "Pro",
                }
            })
        );
    }

    #[test]
    fn deactivation_patch_omits_absent_fields() {
        let body = UpdateRequest {
            fields: UserFieldsPatch {
                subscription_status: "cancelled",
                lemon_squeezy_subscription_id: None,
                plan_name: None,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "fields": { "subscription_status": "cancelled" }
            })
        );
    }

    #[test]
    fn chat_fields_carry_wire_names() {
        let message = NewChatMessage {
            clerk_user_id: "user_1".to_string(),
            role: ChatRole::User,
            content: "hello".to_string(),
        };
        let body = CreateRequest {
            fields: ChatFields {
                clerk_id: message.clerk_user_id,
                role: message.role.as_str().to_string(),
                content: message.content,
                timestamp: "2026-01-01T00:00:00+00:00".to_string(),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["fields"]["clerk_id"], "user_1");
        assert_eq!(json["fields"]["role"], "user");
    }

    #[test]
    fn user_record_mapping_handles_missing_optional_columns() {
        // Airtable omits empty cells from `fields` entirely.
        let record: AirtableRecord<UserFields> = serde_json::from_value(serde_json::json!({
            "id": "recAbc",
            "fields": { "clerk_id": "user_1" }
        }))
        .unwrap();

        let user = UserRecord::from(record);
        assert_eq!(user.record_id, "recAbc");
        assert_eq!(user.subscription_status, SubscriptionStatus::None);
        assert!(user.subscription_id.is_none());
    }

    #[test]
    fn user_record_mapping_parses_persisted_status() {
        let record: AirtableRecord<UserFields> = serde_json::from_value(serde_json::json!({
            "id": "recAbc",
            "fields": {
                "clerk_id": "user_1",
                "subscription_status": "active",
                "lemon_squeezy_subscription_id": "42",
                "plan_name": "Pro"
            }
        }))
        .unwrap();

        let user = UserRecord::from(record);
        assert_eq!(user.subscription_status, SubscriptionStatus::Active);
        assert_eq!(user.subscription_id.as_deref(), Some("42"));
        assert_eq!(user.plan_label.as_deref(), Some("Pro"));
    }

    #[test]
    fn empty_record_list_decodes() {
        let list: RecordList<UserFields> =
            serde_json::from_str(r#"{"records": []}"#).unwrap();
        assert!(list.records.is_empty());
    }
}
