//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `PLANNER_` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use planner_backend::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod airtable;
mod billing;
mod error;
mod server;

pub use airtable::AirtableConfig;
pub use billing::BillingConfig;
pub use error::{ConfigError, ValidationError};
pub use server::ServerConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Contains all configuration sections for the Planner backend.
/// Load using [`AppConfig::load()`] which reads from environment variables.
///
/// The billing and airtable sections default to empty values rather than
/// failing the load. The process still starts without them, but the webhook
/// handler answers 500 on every request until the missing values are supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Billing configuration (Lemon Squeezy webhook signing secret)
    #[serde(default)]
    pub billing: BillingConfig,

    /// Airtable configuration (record store credentials)
    #[serde(default)]
    pub airtable: AirtableConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PLANNER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PLANNER__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PLANNER__BILLING__SIGNING_SECRET=...` -> `billing.signing_secret = ...`
    /// - `PLANNER__AIRTABLE__API_KEY=...` -> `airtable.api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PLANNER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.billing.validate()?;
        self.airtable.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to set environment variables for testing
    /// Uses double underscores to separate nested config values
    fn set_minimal_env() {
        env::set_var("PLANNER__BILLING__SIGNING_SECRET", "shhh-secret");
        env::set_var("PLANNER__AIRTABLE__API_KEY", "keyTestXYZ");
        env::set_var("PLANNER__AIRTABLE__BASE_ID", "appTestBase");
    }

    /// Helper to clear environment variables after testing
    fn clear_env() {
        env::remove_var("PLANNER__BILLING__SIGNING_SECRET");
        env::remove_var("PLANNER__AIRTABLE__API_KEY");
        env::remove_var("PLANNER__AIRTABLE__BASE_ID");
        env::remove_var("PLANNER__SERVER__PORT");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.airtable.base_id, "appTestBase");
        assert!(config.billing.is_configured());
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok());
        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_without_billing_section_still_succeeds() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        // Loading succeeds; validation reports the missing values.
        assert!(result.is_ok());
        let config = result.unwrap();
        assert!(!config.billing.is_configured());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("PLANNER__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
    }
}
