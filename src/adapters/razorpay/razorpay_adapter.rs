//! Razorpay REST adapter.
//!
//! Implements `PaymentGateway` against `POST /v1/subscriptions` with HTTP
//! Basic auth (key id / key secret). One attempt per call; the caller decides
//! what to do with failures.
//!
//! # Configuration
//!
//! ```ignore
//! let config = RazorpayConfig::new(key_id, key_secret);
//! let gateway = RazorpayGateway::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::ports::{CreateGatewaySubscription, GatewayError, GatewaySubscription, PaymentGateway};

pub const DEFAULT_API_BASE_URL: &str = "https://api.razorpay.com";

/// Razorpay API configuration.
///
/// Keys are trimmed. Empty keys are accepted here and reported as
/// `GatewayError::MissingCredentials` when a call is attempted.
#[derive(Clone)]
pub struct RazorpayConfig {
    key_id: SecretString,
    key_secret: SecretString,
    api_base_url: String,
}

impl RazorpayConfig {
    pub fn new(key_id: impl AsRef<str>, key_secret: impl AsRef<str>) -> Self {
        Self {
            key_id: SecretString::new(key_id.as_ref().trim().to_string()),
            key_secret: SecretString::new(key_secret.as_ref().trim().to_string()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn has_credentials(&self) -> bool {
        !self.key_id.expose_secret().is_empty() && !self.key_secret.expose_secret().is_empty()
    }

    fn subscriptions_url(&self) -> String {
        format!("{}/v1/subscriptions", self.api_base_url)
    }
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &"[REDACTED]")
            .field("key_secret", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// Razorpay payment gateway adapter.
pub struct RazorpayGateway {
    config: RazorpayConfig,
    http_client: reqwest::Client,
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_subscription(
        &self,
        request: CreateGatewaySubscription,
    ) -> Result<GatewaySubscription, GatewayError> {
        let key_id = self.config.key_id.expose_secret();
        let key_secret = self.config.key_secret.expose_secret();

        tracing::debug!(
            key_id_len = key_id.len(),
            key_id_prefix = %key_id.chars().take(6).collect::<String>(),
            key_secret_len = key_secret.len(),
            "Razorpay credentials loaded"
        );

        if !self.config.has_credentials() {
            return Err(GatewayError::MissingCredentials);
        }

        let response = self
            .http_client
            .post(self.config.subscriptions_url())
            .basic_auth(key_id, Some(key_secret))
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        let raw: serde_json::Value = response
            .json()
            .await
            .unwrap_or_else(|_| serde_json::json!({}));

        if !status.is_success() {
            tracing::warn!(
                status_code = status.as_u16(),
                plan_id = %request.plan_id,
                "Razorpay create subscription failed"
            );
            return Err(GatewayError::from_response(status.as_u16(), raw));
        }

        serde_json::from_value(raw).map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }
}
