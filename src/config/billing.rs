//! Billing configuration

use secrecy::Secret;
use serde::Deserialize;

use super::error::ValidationError;

/// Billing configuration (Lemon Squeezy)
///
/// The signing secret authenticates inbound webhook deliveries. It is the
/// only billing-side credential this service needs: checkout and customer
/// management happen entirely on the provider's hosted pages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillingConfig {
    /// Lemon Squeezy webhook signing secret
    #[serde(default)]
    pub signing_secret: String,
}

impl BillingConfig {
    /// Check whether a signing secret has been supplied
    pub fn is_configured(&self) -> bool {
        !self.signing_secret.is_empty()
    }

    /// The signing secret wrapped for safe handling
    pub fn signing_secret(&self) -> Secret<String> {
        Secret::new(self.signing_secret.clone())
    }

    /// Validate billing configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.signing_secret.is_empty() {
            return Err(ValidationError::MissingRequired("BILLING_SIGNING_SECRET"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_missing_secret() {
        let config = BillingConfig::default();
        assert!(config.validate().is_err());
        assert!(!config.is_configured());
    }

    #[test]
    fn test_validation_valid_config() {
        let config = BillingConfig {
            signing_secret: "ls_whsec_abc123".to_string(),
        };
        assert!(config.validate().is_ok());
        assert!(config.is_configured());
    }
}
