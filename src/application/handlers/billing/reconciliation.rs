//! ReconciliationEngine - applies classified gateway events to local records.
//!
//! Writes are separate calls with no spanning transaction: the subscription
//! upsert, the user tier write and the owner backfill each succeed or fail on
//! their own. Every write is an overwrite keyed on a stable id, so a
//! redelivered event converges to the same state.

use std::sync::Arc;

use crate::domain::billing::{
    PaymentEntity, PaymentEventKind, PaymentUpdate, SubscriptionEntity, SubscriptionRecord,
    SubscriptionUpsert, Tier, TierDecision, TierSettings,
};
use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::ports::{SubscriptionRepository, UserRepository};

/// What a subscription-lifecycle event changed.
#[derive(Debug, Clone)]
pub struct SubscriptionReconciliation {
    /// The record after the upsert (before any owner backfill).
    pub record: SubscriptionRecord,
    pub decision: TierDecision,
    /// Set when the email resolved to a user.
    pub user: Option<UserTierChange>,
}

/// Effect on the user resolved from the event's email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserTierChange {
    pub user_id: UserId,
    /// Tier written to the user, or `None` when the status left it untouched.
    pub tier_written: Option<Tier>,
}

/// What a payment-lifecycle event changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReconciliation {
    pub gateway_subscription_id: Option<String>,
    pub records_updated: u64,
    pub owner: Option<UserId>,
}

pub struct ReconciliationEngine {
    subscriptions: Arc<dyn SubscriptionRepository>,
    users: Arc<dyn UserRepository>,
}

impl ReconciliationEngine {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            subscriptions,
            users,
        }
    }

    /// Applies a subscription-lifecycle event.
    ///
    /// `event_type` is stored as the status when the entity carries none.
    pub async fn reconcile_subscription(
        &self,
        event_type: &str,
        entity: &SubscriptionEntity,
        email: Option<&str>,
        settings: &TierSettings,
    ) -> Result<SubscriptionReconciliation, DomainError> {
        let gateway_subscription_id = entity
            .id()
            .ok_or_else(|| DomainError::validation("subscription.id", "Subscription id is required"))?;

        let tier = settings.resolve_plan_tier(entity.plan_id());

        let record = self
            .subscriptions
            .upsert(SubscriptionUpsert {
                gateway_subscription_id: gateway_subscription_id.to_string(),
                tier,
                status: entity.status().unwrap_or(event_type).to_string(),
                current_period_end: entity.period_end(),
            })
            .await?;

        let decision = TierDecision::for_status(entity.status(), tier);

        let Some(email) = email else {
            tracing::info!(
                event_type,
                subscription_id = gateway_subscription_id,
                tier = %tier,
                "Subscription reconciled without email"
            );
            return Ok(SubscriptionReconciliation {
                record,
                decision,
                user: None,
            });
        };

        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::info!(
                event_type,
                subscription_id = gateway_subscription_id,
                "No user matches subscription email"
            );
            return Ok(SubscriptionReconciliation {
                record,
                decision,
                user: None,
            });
        };

        let tier_written = decision.next_tier(user.tier);
        match tier_written {
            Some(next) => self.users.update_tier(&user.id, next).await?,
            None => tracing::warn!(
                event_type,
                subscription_id = gateway_subscription_id,
                status = ?entity.status(),
                "Unrecognized subscription status, user tier unchanged"
            ),
        }

        self.subscriptions
            .assign_owner(gateway_subscription_id, &user.id)
            .await?;

        tracing::info!(
            event_type,
            subscription_id = gateway_subscription_id,
            user_id = %user.id,
            tier = ?tier_written,
            "Subscription reconciled"
        );

        Ok(SubscriptionReconciliation {
            record,
            decision,
            user: Some(UserTierChange {
                user_id: user.id,
                tier_written,
            }),
        })
    }

    /// Applies a payment-lifecycle event.
    ///
    /// A payment without a subscription id changes nothing.
    pub async fn reconcile_payment(
        &self,
        kind: PaymentEventKind,
        entity: &PaymentEntity,
        email: Option<&str>,
    ) -> Result<PaymentReconciliation, DomainError> {
        let payment_id = entity
            .id()
            .ok_or_else(|| DomainError::validation("payment.id", "Payment id is required"))?;

        let owner = match email {
            Some(email) => self.users.find_by_email(email).await?.map(|u| u.id),
            None => None,
        };

        let Some(gateway_subscription_id) = entity.subscription_id() else {
            tracing::info!(
                event_type = kind.as_str(),
                payment_id,
                "Payment has no subscription, acknowledged only"
            );
            return Ok(PaymentReconciliation {
                gateway_subscription_id: None,
                records_updated: 0,
                owner,
            });
        };

        let records_updated = self
            .subscriptions
            .record_payment(
                gateway_subscription_id,
                PaymentUpdate {
                    payment_id: payment_id.to_string(),
                    order_id: entity.order_id().map(str::to_string),
                    status: kind.payment_status(),
                    paid_at: Timestamp::now(),
                    owner: owner.clone(),
                },
            )
            .await?;

        tracing::info!(
            event_type = kind.as_str(),
            payment_id,
            subscription_id = gateway_subscription_id,
            records_updated,
            "Payment reconciled"
        );

        Ok(PaymentReconciliation {
            gateway_subscription_id: Some(gateway_subscription_id.to_string()),
            records_updated,
            owner,
        })
    }
}
