//! Payment gateway port for creating recurring subscriptions.
//!
//! A single call, single attempt: failures are surfaced to the caller with the
//! gateway's own error payload attached.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Port for the gateway's subscription-creation API.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_subscription(
        &self,
        request: CreateGatewaySubscription,
    ) -> Result<GatewaySubscription, GatewayError>;
}

/// Request body for the gateway's subscription-creation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGatewaySubscription {
    pub plan_id: String,

    /// Number of billing cycles before the subscription completes.
    pub total_count: u32,

    /// 1 lets the gateway notify the customer directly.
    pub customer_notify: u8,

    pub quantity: u32,

    /// Read back by the webhook handler to resolve the user.
    pub notes: SubscriptionNotes,
}

/// Notes embedded in a new subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionNotes {
    pub app_user_email: String,
    pub tier: String,
}

/// Subscription as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GatewaySubscription {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub status: Option<String>,

    /// Hosted checkout link, when the gateway provides one.
    #[serde(default)]
    pub short_url: Option<String>,

    #[serde(default)]
    pub plan_id: Option<String>,
}

/// Errors from the gateway call.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Key id or key secret is not configured.
    #[error("Missing Razorpay keys")]
    MissingCredentials,

    /// The gateway answered with a non-success status.
    #[error("{description}")]
    Api {
        status_code: u16,
        description: String,
        raw: serde_json::Value,
    },

    /// The request never produced a response.
    #[error("Gateway request failed: {0}")]
    Network(String),

    /// A success response whose body could not be decoded.
    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// Builds an API error from a response body, using the gateway's
    /// `error.description` when present.
    pub fn from_response(status_code: u16, raw: serde_json::Value) -> Self {
        let description = raw
            .get("error")
            .and_then(|e| e.get("description"))
            .and_then(|d| d.as_str())
            .filter(|d| !d.is_empty())
            .unwrap_or("Razorpay error")
            .to_string();
        GatewayError::Api {
            status_code,
            description,
            raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_error_uses_gateway_description() {
        let err = GatewayError::from_response(
            400,
            json!({"error": {"code": "BAD_REQUEST_ERROR", "description": "The id provided does not exist"}}),
        );
        assert_eq!(err.to_string(), "The id provided does not exist");
    }

    #[test]
    fn api_error_falls_back_to_generic_description() {
        let err = GatewayError::from_response(502, json!({}));
        match err {
            GatewayError::Api {
                status_code,
                description,
                ..
            } => {
                assert_eq!(status_code, 502);
                assert_eq!(description, "Razorpay error");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn request_serializes_gateway_field_names() {
        let request = CreateGatewaySubscription {
            plan_id: "plan_basic".to_string(),
            total_count: 120,
            customer_notify: 1,
            quantity: 1,
            notes: SubscriptionNotes {
                app_user_email: "a@x.com".to_string(),
                tier: "BASIC".to_string(),
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["total_count"], 120);
        assert_eq!(value["notes"]["app_user_email"], "a@x.com");
    }

    #[test]
    fn payment_gateway_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn PaymentGateway>();
    }
}
