//! Payment gateway configuration
//!
//! Gateway credentials are optional at load time. Their absence surfaces as a
//! 500 from the endpoint that needs them, so a deployment can receive
//! webhooks before checkout is configured (and vice versa).

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Payment configuration (Razorpay)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    #[serde(default)]
    pub razorpay_key_id: Option<String>,

    #[serde(default)]
    pub razorpay_key_secret: Option<SecretString>,

    /// Shared secret for webhook HMAC signatures
    #[serde(default)]
    pub razorpay_webhook_secret: Option<SecretString>,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// How long the tier settings record is cached, in seconds (0 disables)
    #[serde(default = "default_settings_cache_ttl")]
    pub settings_cache_ttl_secs: u64,

    /// Billing cycles requested per subscription
    #[serde(default = "default_total_count")]
    pub subscription_total_count: u32,
}

impl PaymentConfig {
    pub fn key_id(&self) -> &str {
        self.razorpay_key_id.as_deref().map(str::trim).unwrap_or_default()
    }

    pub fn key_secret(&self) -> &str {
        exposed(&self.razorpay_key_secret)
    }

    pub fn webhook_secret(&self) -> &str {
        exposed(&self.razorpay_webhook_secret)
    }

    pub fn settings_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.settings_cache_ttl_secs)
    }

    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.subscription_total_count == 0 {
            return Err(ValidationError::InvalidTotalCount);
        }
        if *environment == Environment::Production && !self.api_base_url.starts_with("https://") {
            return Err(ValidationError::GatewayUrlMustBeHttps);
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            razorpay_key_id: None,
            razorpay_key_secret: None,
            razorpay_webhook_secret: None,
            api_base_url: default_api_base_url(),
            settings_cache_ttl_secs: default_settings_cache_ttl(),
            subscription_total_count: default_total_count(),
        }
    }
}

fn exposed(secret: &Option<SecretString>) -> &str {
    secret
        .as_ref()
        .map(|s| s.expose_secret().trim())
        .unwrap_or_default()
}

fn default_api_base_url() -> String {
    crate::adapters::razorpay::DEFAULT_API_BASE_URL.to_string()
}

fn default_settings_cache_ttl() -> u64 {
    60
}

fn default_total_count() -> u32 {
    120
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_credentials_unset() {
        let config = PaymentConfig::default();
        assert_eq!(config.key_id(), "");
        assert_eq!(config.key_secret(), "");
        assert_eq!(config.webhook_secret(), "");
        assert_eq!(config.subscription_total_count, 120);
        assert_eq!(config.settings_cache_ttl(), Duration::from_secs(60));
        assert!(config.validate(&Environment::Production).is_ok());
    }

    #[test]
    fn credentials_are_trimmed() {
        let config = PaymentConfig {
            razorpay_key_id: Some(" rzp_test_abc ".to_string()),
            razorpay_key_secret: Some(SecretString::new("secret\n".to_string())),
            razorpay_webhook_secret: Some(SecretString::new("  whsec ".to_string())),
            ..Default::default()
        };
        assert_eq!(config.key_id(), "rzp_test_abc");
        assert_eq!(config.key_secret(), "secret");
        assert_eq!(config.webhook_secret(), "whsec");
    }

    #[test]
    fn zero_total_count_is_rejected() {
        let config = PaymentConfig {
            subscription_total_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidTotalCount)
        ));
    }

    #[test]
    fn plain_http_gateway_only_allowed_outside_production() {
        let config = PaymentConfig {
            api_base_url: "http://localhost:9000".to_string(),
            ..Default::default()
        };
        assert!(config.validate(&Environment::Development).is_ok());
        assert!(config.validate(&Environment::Production).is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = PaymentConfig {
            razorpay_webhook_secret: Some(SecretString::new("whsec_hidden".to_string())),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("whsec_hidden"));
    }
}
