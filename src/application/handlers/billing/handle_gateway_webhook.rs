//! HandleGatewayWebhookHandler - Command handler for gateway webhook deliveries.
//!
//! verify → decode → classify → reconcile. Verification runs on the raw body
//! before anything is parsed or persisted; a rejected delivery touches no
//! storage.

use std::sync::Arc;

use crate::domain::billing::{classify, ClassifiedEvent, GatewayEvent, WebhookError, WebhookVerifier};
use crate::ports::TierSettingsStore;

use super::reconciliation::ReconciliationEngine;

/// Command carrying one webhook delivery.
#[derive(Debug, Clone)]
pub struct HandleGatewayWebhookCommand {
    /// Raw request body, exactly as received.
    pub body: Vec<u8>,
    /// Signature header value, if present.
    pub signature: Option<String>,
}

/// Acknowledgement returned to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleGatewayWebhookResult {
    /// A lifecycle event was applied.
    Handled { event_type: String },
    /// Subscription event without a subscription entity id.
    NoSubscriptionEntity,
    /// Payment event without a payment entity id.
    NoPaymentEntity,
    /// Event type outside the handled set.
    Ignored { event_type: String },
}

pub struct HandleGatewayWebhookHandler {
    /// `None` when the webhook secret is not configured.
    verifier: Option<WebhookVerifier>,
    settings: Arc<dyn TierSettingsStore>,
    engine: ReconciliationEngine,
}

impl HandleGatewayWebhookHandler {
    /// Builds the handler. An empty secret is accepted here and reported as
    /// `WebhookError::MissingSecret` on every delivery.
    pub fn new(
        webhook_secret: &str,
        settings: Arc<dyn TierSettingsStore>,
        engine: ReconciliationEngine,
    ) -> Self {
        let verifier = WebhookVerifier::new(webhook_secret).ok();
        if verifier.is_none() {
            tracing::warn!("Webhook secret not configured, deliveries will be rejected");
        }
        Self {
            verifier,
            settings,
            engine,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandleGatewayWebhookCommand,
    ) -> Result<HandleGatewayWebhookResult, WebhookError> {
        // 1. Verify signature on the raw bytes
        let verifier = self.verifier.as_ref().ok_or(WebhookError::MissingSecret)?;
        verifier
            .verify_request(&cmd.body, cmd.signature.as_deref())
            .map_err(|e| {
                tracing::warn!(error = %e, "Webhook rejected");
                e
            })?;

        // 2. Decode
        let event: GatewayEvent = serde_json::from_slice(&cmd.body)
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;

        // 3. Classify and reconcile
        let classified = classify(event);
        tracing::debug!(event_type = classified.event_type(), "Webhook verified");

        match classified {
            ClassifiedEvent::Subscription {
                kind,
                entity,
                email,
            } => {
                let settings = self.settings.get_or_create().await?;
                self.engine
                    .reconcile_subscription(kind.as_str(), &entity, email.as_deref(), &settings)
                    .await?;
                Ok(HandleGatewayWebhookResult::Handled {
                    event_type: kind.as_str().to_string(),
                })
            }
            ClassifiedEvent::Payment {
                kind,
                entity,
                email,
            } => {
                self.engine
                    .reconcile_payment(kind, &entity, email.as_deref())
                    .await?;
                Ok(HandleGatewayWebhookResult::Handled {
                    event_type: kind.as_str().to_string(),
                })
            }
            ClassifiedEvent::MissingSubscriptionEntity { kind } => {
                tracing::info!(event_type = kind.as_str(), "No subscription entity");
                Ok(HandleGatewayWebhookResult::NoSubscriptionEntity)
            }
            ClassifiedEvent::MissingPaymentEntity { kind } => {
                tracing::info!(event_type = kind.as_str(), "No payment entity");
                Ok(HandleGatewayWebhookResult::NoPaymentEntity)
            }
            ClassifiedEvent::Unhandled { event_type } => {
                tracing::debug!(event_type = %event_type, "Ignoring webhook event");
                Ok(HandleGatewayWebhookResult::Ignored { event_type })
            }
        }
    }
}
