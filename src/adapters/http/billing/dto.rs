//! HTTP DTOs for billing endpoints.
//!
//! Response field names are camelCase to match what the web client and the
//! gateway dashboard already consume.

use serde::{Deserialize, Serialize};

use crate::application::handlers::billing::{CreateSubscriptionResult, HandleGatewayWebhookResult};
use crate::domain::foundation::AuthenticatedUser;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /subscriptions`. A body that fails to decode is treated as `{}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSubscriptionRequest {
    #[serde(default)]
    pub tier: Option<String>,
}

impl CreateSubscriptionRequest {
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Webhook acknowledgement. Exactly one of the optional fields is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookAck {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handled: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignored: Option<String>,
}

impl From<HandleGatewayWebhookResult> for WebhookAck {
    fn from(result: HandleGatewayWebhookResult) -> Self {
        let ack = WebhookAck {
            ok: true,
            handled: None,
            note: None,
            ignored: None,
        };
        match result {
            HandleGatewayWebhookResult::Handled { event_type } => WebhookAck {
                handled: Some(event_type),
                ..ack
            },
            HandleGatewayWebhookResult::NoSubscriptionEntity => WebhookAck {
                note: Some("No subscription entity".to_string()),
                ..ack
            },
            HandleGatewayWebhookResult::NoPaymentEntity => WebhookAck {
                note: Some("No payment entity".to_string()),
                ..ack
            },
            HandleGatewayWebhookResult::Ignored { event_type } => WebhookAck {
                ignored: Some(event_type),
                ..ack
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionResponse {
    pub subscription_id: String,
    pub status: Option<String>,
    pub short_url: Option<String>,
    pub plan_id: String,
}

impl From<CreateSubscriptionResult> for CreateSubscriptionResponse {
    fn from(result: CreateSubscriptionResult) -> Self {
        Self {
            subscription_id: result.subscription_id,
            status: result.status,
            short_url: result.short_url,
            plan_id: result.plan_id,
        }
    }
}

/// Caller identity as seen by the billing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: String,
    pub email: String,
    pub role: String,
    pub tier: String,
    pub has_active_tier: bool,
}

impl From<&AuthenticatedUser> for MeResponse {
    fn from(user: &AuthenticatedUser) -> Self {
        Self {
            user_id: user.id.to_string(),
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
            tier: user.tier.as_str().to_string(),
            has_active_tier: user.has_active_tier(),
        }
    }
}

/// Error body. Gateway failures also carry the gateway's raw payload and status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            raw: None,
            status_code: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::Tier;
    use crate::domain::foundation::{Role, UserId};
    use serde_json::json;

    #[test]
    fn invalid_request_body_decodes_as_empty() {
        assert_eq!(CreateSubscriptionRequest::from_body(b"not json").tier, None);
        assert_eq!(CreateSubscriptionRequest::from_body(b"").tier, None);
        assert_eq!(
            CreateSubscriptionRequest::from_body(br#"{"tier":"pro"}"#).tier.as_deref(),
            Some("pro")
        );
    }

    #[test]
    fn ack_serializes_only_the_set_field() {
        let handled = WebhookAck::from(HandleGatewayWebhookResult::Handled {
            event_type: "payment.captured".to_string(),
        });
        assert_eq!(
            serde_json::to_value(handled).unwrap(),
            json!({"ok": true, "handled": "payment.captured"})
        );

        let note = WebhookAck::from(HandleGatewayWebhookResult::NoPaymentEntity);
        assert_eq!(
            serde_json::to_value(note).unwrap(),
            json!({"ok": true, "note": "No payment entity"})
        );
    }

    #[test]
    fn create_response_uses_camel_case_and_null_short_url() {
        let response = CreateSubscriptionResponse {
            subscription_id: "sub_1".to_string(),
            status: Some("created".to_string()),
            short_url: None,
            plan_id: "plan_basic".to_string(),
        };
        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({"subscriptionId": "sub_1", "status": "created", "shortUrl": null, "planId": "plan_basic"})
        );
    }

    #[test]
    fn me_response_reports_active_tier() {
        let user = AuthenticatedUser::new(UserId::new("u1").unwrap(), "a@x.com", Role::Admin, Tier::Pro);
        let me = MeResponse::from(&user);
        assert_eq!(me.tier, "PRO");
        assert_eq!(me.role, "ADMIN");
        assert!(me.has_active_tier);
    }

    #[test]
    fn plain_error_omits_gateway_fields() {
        assert_eq!(
            serde_json::to_value(ErrorResponse::new("Invalid tier")).unwrap(),
            json!({"error": "Invalid tier"})
        );
    }
}
