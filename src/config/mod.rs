//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables via the
//! `config` and `dotenvy` crates. Variables use the `TIER_BILLING` prefix and
//! `__` between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use tier_billing::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod error;
mod payment;
mod server;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "TIER_BILLING";

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub database: DatabaseConfig,

    pub auth: AuthConfig,

    #[serde(default)]
    pub payment: PaymentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` if present (development)
    /// 2. Reads `TIER_BILLING__*` variables, `__` separating nested keys
    ///
    /// - `TIER_BILLING__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `TIER_BILLING__PAYMENT__RAZORPAY_WEBHOOK_SECRET=...` -> `payment.razorpay_webhook_secret`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or unparseable.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Semantic validation of loaded values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.payment.validate(&self.server.environment)?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 6] = [
        "TIER_BILLING__DATABASE__URL",
        "TIER_BILLING__AUTH__JWT_SECRET",
        "TIER_BILLING__SERVER__PORT",
        "TIER_BILLING__SERVER__ENVIRONMENT",
        "TIER_BILLING__PAYMENT__RAZORPAY_WEBHOOK_SECRET",
        "TIER_BILLING__PAYMENT__SUBSCRIPTION_TOTAL_COUNT",
    ];

    fn set_minimal_env() {
        env::set_var("TIER_BILLING__DATABASE__URL", "postgresql://test@localhost/billing");
        env::set_var("TIER_BILLING__AUTH__JWT_SECRET", "jwt-test-secret");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn loads_minimal_environment() {
        let config = load_with(&[]).unwrap();

        assert_eq!(config.database.url, "postgresql://test@localhost/billing");
        assert_eq!(config.auth.jwt_secret(), "jwt-test-secret");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.payment.webhook_secret(), "");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn reads_nested_payment_values() {
        let config = load_with(&[
            ("TIER_BILLING__PAYMENT__RAZORPAY_WEBHOOK_SECRET", "whsec_env"),
            ("TIER_BILLING__PAYMENT__SUBSCRIPTION_TOTAL_COUNT", "12"),
        ])
        .unwrap();

        assert_eq!(config.payment.webhook_secret(), "whsec_env");
        assert_eq!(config.payment.subscription_total_count, 12);
    }

    #[test]
    fn production_environment_is_detected() {
        let config = load_with(&[
            ("TIER_BILLING__SERVER__ENVIRONMENT", "production"),
            ("TIER_BILLING__SERVER__PORT", "3000"),
        ])
        .unwrap();

        assert!(config.is_production());
        assert_eq!(config.server.port, 3000);
    }
}
