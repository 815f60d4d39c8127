//! Gateway webhook event types.
//!
//! Only fields relevant to reconciliation are captured. Every field is
//! optional: gateways send partial test events, and their absence is handled
//! by the classifier rather than rejected at decode time.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Note keys that may carry the purchaser's email, in lookup order.
pub const EMAIL_NOTE_KEYS: [&str; 3] = ["app_user_email", "email", "user_email"];

/// Decoded webhook event.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GatewayEvent {
    /// Event type, e.g. `subscription.activated`. May be absent or null.
    #[serde(default)]
    pub event: Option<String>,

    #[serde(default)]
    pub payload: Option<EventPayload>,
}

/// Entities attached to an event. At most one of each kind.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EventPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<EntityEnvelope<SubscriptionEntity>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<EntityEnvelope<PaymentEntity>>,
}

/// The gateway nests every entity under an `entity` key.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EntityEnvelope<T> {
    pub entity: Option<T>,
}

/// Subscription entity as reported by the gateway.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SubscriptionEntity {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub plan_id: Option<String>,

    /// Gateway-native status.
    #[serde(default)]
    pub status: Option<String>,

    /// End of the current billing period (epoch seconds).
    #[serde(default)]
    pub current_end: Option<i64>,

    /// Alternate spelling of `current_end`, preferred when both are present.
    #[serde(default)]
    pub current_end_at: Option<i64>,

    /// Free-form notes. Sent as an object, or as an empty array when unset.
    #[serde(default)]
    pub notes: Option<serde_json::Value>,
}

/// Payment entity as reported by the gateway.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PaymentEntity {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub order_id: Option<String>,

    /// Subscription this payment was charged against, if any.
    #[serde(default)]
    pub subscription_id: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub notes: Option<serde_json::Value>,
}

impl SubscriptionEntity {
    /// Returns the id if present and non-empty.
    pub fn id(&self) -> Option<&str> {
        non_empty(self.id.as_deref())
    }

    pub fn plan_id(&self) -> Option<&str> {
        non_empty(self.plan_id.as_deref())
    }

    pub fn status(&self) -> Option<&str> {
        non_empty(self.status.as_deref())
    }

    /// Period end converted from epoch seconds, or `None` if absent.
    pub fn period_end(&self) -> Option<Timestamp> {
        self.current_end_at
            .or(self.current_end)
            .and_then(Timestamp::from_unix_secs)
    }
}

impl PaymentEntity {
    pub fn id(&self) -> Option<&str> {
        non_empty(self.id.as_deref())
    }

    pub fn order_id(&self) -> Option<&str> {
        non_empty(self.order_id.as_deref())
    }

    pub fn subscription_id(&self) -> Option<&str> {
        non_empty(self.subscription_id.as_deref())
    }
}

impl GatewayEvent {
    /// Event type, or `""` when the gateway sent none.
    pub fn event_type(&self) -> &str {
        self.event.as_deref().unwrap_or_default()
    }

    pub fn subscription(&self) -> Option<&SubscriptionEntity> {
        self.payload
            .as_ref()
            .and_then(|p| p.subscription.as_ref())
            .and_then(|s| s.entity.as_ref())
    }

    pub fn payment(&self) -> Option<&PaymentEntity> {
        self.payload
            .as_ref()
            .and_then(|p| p.payment.as_ref())
            .and_then(|p| p.entity.as_ref())
    }

    /// Reads the purchaser's email from entity notes.
    ///
    /// Subscription notes win over payment notes when the subscription entity
    /// carries any notes at all.
    pub fn notes_email(&self) -> Option<String> {
        let notes = self
            .subscription()
            .and_then(|s| s.notes.as_ref())
            .filter(|n| !n.is_null())
            .or_else(|| {
                self.payment()
                    .and_then(|p| p.notes.as_ref())
                    .filter(|n| !n.is_null())
            })?;

        email_from_notes(notes)
    }
}

fn email_from_notes(notes: &serde_json::Value) -> Option<String> {
    let map = notes.as_object()?;
    EMAIL_NOTE_KEYS.iter().find_map(|key| {
        map.get(*key)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
