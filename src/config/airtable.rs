//! Airtable record store configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Airtable configuration
///
/// The record store holds the user table (keyed by Clerk user id) and the
/// chat history table. Both live in a single base identified by `base_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct AirtableConfig {
    /// Airtable API key (personal access token)
    #[serde(default)]
    pub api_key: String,

    /// Airtable base identifier (appXXXXXXXXXXXXXX)
    #[serde(default)]
    pub base_id: String,

    /// Table holding user records
    #[serde(default = "default_users_table")]
    pub users_table: String,

    /// Table holding chat history records
    #[serde(default = "default_chat_table")]
    pub chat_table: String,
}

impl AirtableConfig {
    /// Check whether both required credentials have been supplied
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.base_id.is_empty()
    }

    /// Validate Airtable configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.is_empty() {
            return Err(ValidationError::MissingRequired("AIRTABLE_API_KEY"));
        }
        if self.base_id.is_empty() {
            return Err(ValidationError::MissingRequired("AIRTABLE_BASE_ID"));
        }
        Ok(())
    }
}

impl Default for AirtableConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_id: String::new(),
            users_table: default_users_table(),
            chat_table: default_chat_table(),
        }
    }
}

fn default_users_table() -> String {
    "Users".to_string()
}

fn default_chat_table() -> String {
    "Chat_History".to_string()
}
