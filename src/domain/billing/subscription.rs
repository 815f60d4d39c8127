//! Local subscription record and the write shapes applied to it.
//!
//! A record is keyed by the gateway subscription id: at most one record exists
//! per gateway id. It is created on the first lifecycle event for an unseen id,
//! updated on every later event, and never deleted by the billing core.

use serde::{Deserialize, Serialize};

use super::Tier;
use crate::domain::foundation::{SubscriptionRecordId, Timestamp, UserId};

/// Outcome of the most recent payment against a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "paid" => Some(PaymentStatus::Paid),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }
}

/// Gateway status written when a payment is captured.
pub const ACTIVE_STATUS: &str = "active";

/// Persisted subscription record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub id: SubscriptionRecordId,
    /// Gateway subscription id; the correlation key.
    pub gateway_subscription_id: String,
    pub tier: Tier,
    /// Gateway-native status string (`active`, `paused`, `cancelled`, ...).
    pub status: String,
    /// Owning user. `None` is the placeholder until the owner is resolved by email.
    pub owner: Option<UserId>,
    pub current_period_end: Option<Timestamp>,
    pub last_payment_id: Option<String>,
    pub last_payment_order_id: Option<String>,
    pub last_payment_status: Option<PaymentStatus>,
    pub last_payment_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields written by a subscription-lifecycle event.
///
/// Applied as a full replacement of tier, status and period end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionUpsert {
    pub gateway_subscription_id: String,
    pub tier: Tier,
    pub status: String,
    pub current_period_end: Option<Timestamp>,
}

/// Fields written to every record matching a payment's subscription id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentUpdate {
    pub payment_id: String,
    pub order_id: Option<String>,
    pub status: PaymentStatus,
    pub paid_at: Timestamp,
    /// Attach this owner when the payer was resolved.
    pub owner: Option<UserId>,
}

impl PaymentUpdate {
    /// A captured payment forces the subscription back to `active`.
    pub fn forces_active(&self) -> bool {
        self.status == PaymentStatus::Paid
    }
}

impl SubscriptionRecord {
    /// Creates a record from the first lifecycle event for a gateway id.
    /// The owner starts as the placeholder.
    pub fn from_upsert(upsert: SubscriptionUpsert, now: Timestamp) -> Self {
        Self {
            id: SubscriptionRecordId::new(),
            gateway_subscription_id: upsert.gateway_subscription_id,
            tier: upsert.tier,
            status: upsert.status,
            owner: None,
            current_period_end: upsert.current_period_end,
            last_payment_id: None,
            last_payment_order_id: None,
            last_payment_status: None,
            last_payment_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites tier, status and period end. Other fields are untouched.
    pub fn apply_upsert(&mut self, upsert: &SubscriptionUpsert, now: Timestamp) {
        self.tier = upsert.tier;
        self.status = upsert.status.clone();
        self.current_period_end = upsert.current_period_end;
        self.updated_at = now;
    }

    /// Records a payment outcome.
    pub fn apply_payment(&mut self, payment: &PaymentUpdate, now: Timestamp) {
        self.last_payment_id = Some(payment.payment_id.clone());
        self.last_payment_order_id = payment.order_id.clone();
        self.last_payment_status = Some(payment.status);
        self.last_payment_at = Some(payment.paid_at);
        if payment.forces_active() {
            self.status = ACTIVE_STATUS.to_string();
        }
        if let Some(owner) = &payment.owner {
            self.owner = Some(owner.clone());
        }
        self.updated_at = now;
    }

    /// Replaces the placeholder (or previous) owner.
    pub fn assign_owner(&mut self, owner: UserId, now: Timestamp) {
        self.owner = Some(owner);
        self.updated_at = now;
    }

    pub fn has_placeholder_owner(&self) -> bool {
        self.owner.is_none()
    }
}
