//! CreateSubscriptionHandler - Command handler for starting a recurring subscription.
//!
//! Creates the subscription at the gateway with notes carrying the caller's
//! email and tier. The webhook handler later reads those notes back to find
//! the user, so the note keys here must match what reconciliation looks up.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::billing::Tier;
use crate::domain::foundation::{AuthenticatedUser, DomainError};
use crate::ports::{
    CreateGatewaySubscription, GatewayError, PaymentGateway, SubscriptionNotes, TierSettingsStore,
};

/// Default number of billing cycles requested from the gateway.
pub const DEFAULT_TOTAL_COUNT: u32 = 120;

/// Command to start a subscription for the authenticated caller.
#[derive(Debug, Clone)]
pub struct CreateSubscriptionCommand {
    pub caller: AuthenticatedUser,
    /// Requested tier as sent by the client, matched case-insensitively.
    pub tier: String,
}

/// Result of a successful gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSubscriptionResult {
    pub subscription_id: String,
    pub status: Option<String>,
    /// Hosted checkout link, when the gateway returned one.
    pub short_url: Option<String>,
    pub plan_id: String,
}

/// Errors from the subscription-creation path.
#[derive(Debug, Clone, Error)]
pub enum BillingError {
    #[error("Invalid tier")]
    InvalidTier,

    #[error("Missing plan id")]
    MissingPlanId,

    #[error("Missing Razorpay keys")]
    MissingGatewayCredentials,

    /// The gateway rejected the call. The payload is relayed for diagnostics.
    #[error("{description}")]
    Gateway {
        status_code: u16,
        description: String,
        raw: serde_json::Value,
    },

    #[error("{0}")]
    Infrastructure(String),
}

impl From<DomainError> for BillingError {
    fn from(err: DomainError) -> Self {
        BillingError::Infrastructure(err.to_string())
    }
}

impl From<GatewayError> for BillingError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::MissingCredentials => BillingError::MissingGatewayCredentials,
            GatewayError::Api {
                status_code,
                description,
                raw,
            } => BillingError::Gateway {
                status_code,
                description,
                raw,
            },
            other @ (GatewayError::Network(_) | GatewayError::InvalidResponse(_)) => {
                BillingError::Infrastructure(other.to_string())
            }
        }
    }
}

pub struct CreateSubscriptionHandler {
    settings: Arc<dyn TierSettingsStore>,
    gateway: Arc<dyn PaymentGateway>,
    total_count: u32,
}

impl CreateSubscriptionHandler {
    pub fn new(settings: Arc<dyn TierSettingsStore>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            settings,
            gateway,
            total_count: DEFAULT_TOTAL_COUNT,
        }
    }

    pub fn with_total_count(mut self, total_count: u32) -> Self {
        self.total_count = total_count;
        self
    }

    pub async fn handle(
        &self,
        cmd: CreateSubscriptionCommand,
    ) -> Result<CreateSubscriptionResult, BillingError> {
        // 1. Validate tier
        let tier = Tier::parse_purchasable(&cmd.tier).ok_or(BillingError::InvalidTier)?;

        // 2. Resolve plan id from settings
        let settings = self.settings.get_or_create().await?;
        let plan_id = settings
            .plan_id_for(tier)
            .ok_or(BillingError::MissingPlanId)?
            .to_string();

        // 3. Create at the gateway (single attempt)
        let created = self
            .gateway
            .create_subscription(CreateGatewaySubscription {
                plan_id: plan_id.clone(),
                total_count: self.total_count,
                customer_notify: 1,
                quantity: 1,
                notes: SubscriptionNotes {
                    app_user_email: cmd.caller.email.clone(),
                    tier: tier.as_str().to_string(),
                },
            })
            .await
            .map_err(|e| {
                tracing::warn!(user_id = %cmd.caller.id, tier = %tier, error = %e, "Subscription creation failed");
                BillingError::from(e)
            })?;

        tracing::info!(
            user_id = %cmd.caller.id,
            tier = %tier,
            subscription_id = %created.id,
            "Subscription created"
        );

        Ok(CreateSubscriptionResult {
            subscription_id: created.id,
            status: created.status,
            short_url: created.short_url.filter(|u| !u.is_empty()),
            plan_id: created.plan_id.filter(|p| !p.is_empty()).unwrap_or(plan_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryTierSettingsStore;
    use crate::adapters::razorpay::MockPaymentGateway;
    use crate::domain::billing::TierSettings;
    use crate::domain::foundation::{Role, UserId};
    use crate::ports::GatewaySubscription;
    use serde_json::json;

    fn caller() -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new("user-a").unwrap(), "a@x.com", Role::User, Tier::None)
    }

    fn command(tier: &str) -> CreateSubscriptionCommand {
        CreateSubscriptionCommand {
            caller: caller(),
            tier: tier.to_string(),
        }
    }

    fn configured() -> Arc<InMemoryTierSettingsStore> {
        Arc::new(InMemoryTierSettingsStore::with_settings(TierSettings {
            basic_plan_id: Some("plan_basic".to_string()),
            pro_plan_id: Some("plan_pro".to_string()),
            ..Default::default()
        }))
    }

    #[tokio::test]
    async fn creates_subscription_with_notes_for_webhook() {
        let gateway = Arc::new(MockPaymentGateway::new());
        let handler = CreateSubscriptionHandler::new(configured(), gateway.clone());

        let result = handler.handle(command("pro")).await.unwrap();

        assert_eq!(result.subscription_id, "sub_mock");
        assert_eq!(result.plan_id, "plan_pro");
        let request = &gateway.requests()[0];
        assert_eq!(request.plan_id, "plan_pro");
        assert_eq!(request.total_count, 120);
        assert_eq!(request.customer_notify, 1);
        assert_eq!(request.quantity, 1);
        assert_eq!(request.notes.app_user_email, "a@x.com");
        assert_eq!(request.notes.tier, "PRO");
    }

    #[tokio::test]
    async fn tier_is_case_insensitive() {
        let gateway = Arc::new(MockPaymentGateway::new());
        let handler = CreateSubscriptionHandler::new(configured(), gateway.clone());

        handler.handle(command("Basic")).await.unwrap();

        assert_eq!(gateway.requests()[0].plan_id, "plan_basic");
    }

    #[tokio::test]
    async fn invalid_tier_is_rejected_before_gateway() {
        let gateway = Arc::new(MockPaymentGateway::new());
        let handler = CreateSubscriptionHandler::new(configured(), gateway.clone());

        for tier in ["", "none", "GOLD"] {
            let result = handler.handle(command(tier)).await;
            assert!(matches!(result, Err(BillingError::InvalidTier)), "tier {:?}", tier);
        }
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_plan_id_is_rejected() {
        let gateway = Arc::new(MockPaymentGateway::new());
        let settings = Arc::new(InMemoryTierSettingsStore::new());
        let handler = CreateSubscriptionHandler::new(settings, gateway.clone());

        let result = handler.handle(command("BASIC")).await;

        assert!(matches!(result, Err(BillingError::MissingPlanId)));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_credentials_map_to_configuration_error() {
        let gateway = Arc::new(MockPaymentGateway::new().with_error(GatewayError::MissingCredentials));
        let handler = CreateSubscriptionHandler::new(configured(), gateway);

        let result = handler.handle(command("BASIC")).await;

        assert!(matches!(result, Err(BillingError::MissingGatewayCredentials)));
    }

    #[tokio::test]
    async fn gateway_rejection_relays_payload() {
        let raw = json!({"error": {"description": "plan not found"}});
        let gateway = Arc::new(
            MockPaymentGateway::new().with_error(GatewayError::from_response(400, raw.clone())),
        );
        let handler = CreateSubscriptionHandler::new(configured(), gateway.clone());

        let result = handler.handle(command("PRO")).await;

        match result {
            Err(BillingError::Gateway {
                status_code,
                description,
                raw: relayed,
            }) => {
                assert_eq!(status_code, 400);
                assert_eq!(description, "plan not found");
                assert_eq!(relayed, raw);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn missing_gateway_plan_id_falls_back_to_requested() {
        let gateway = Arc::new(MockPaymentGateway::new().with_response(GatewaySubscription {
            id: "sub_9".to_string(),
            status: Some("created".to_string()),
            short_url: Some(String::new()),
            plan_id: None,
        }));
        let handler = CreateSubscriptionHandler::new(configured(), gateway);

        let result = handler.handle(command("BASIC")).await.unwrap();

        assert_eq!(result.plan_id, "plan_basic");
        assert_eq!(result.short_url, None);
    }

    #[tokio::test]
    async fn total_count_is_configurable() {
        let gateway = Arc::new(MockPaymentGateway::new());
        let handler =
            CreateSubscriptionHandler::new(configured(), gateway.clone()).with_total_count(12);

        handler.handle(command("PRO")).await.unwrap();

        assert_eq!(gateway.requests()[0].total_count, 12);
    }
}
