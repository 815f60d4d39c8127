//! Event classification.
//!
//! Assigns a decoded gateway event to exactly one bucket: subscription
//! lifecycle, payment lifecycle, or unhandled. Missing entities are reported
//! as their own outcome so the caller can acknowledge them as no-ops.

use super::gateway_event::{GatewayEvent, PaymentEntity, SubscriptionEntity};
use super::subscription::PaymentStatus;

/// Subscription lifecycle event kinds (`subscription.*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionEventKind {
    Activated,
    Resumed,
    Paused,
    Cancelled,
    Completed,
    Halted,
}

impl SubscriptionEventKind {
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "subscription.activated" => Some(Self::Activated),
            "subscription.resumed" => Some(Self::Resumed),
            "subscription.paused" => Some(Self::Paused),
            "subscription.cancelled" => Some(Self::Cancelled),
            "subscription.completed" => Some(Self::Completed),
            "subscription.halted" => Some(Self::Halted),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Activated => "subscription.activated",
            Self::Resumed => "subscription.resumed",
            Self::Paused => "subscription.paused",
            Self::Cancelled => "subscription.cancelled",
            Self::Completed => "subscription.completed",
            Self::Halted => "subscription.halted",
        }
    }
}

/// Payment lifecycle event kinds (`payment.*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentEventKind {
    Captured,
    Failed,
}

impl PaymentEventKind {
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "payment.captured" => Some(Self::Captured),
            "payment.failed" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Captured => "payment.captured",
            Self::Failed => "payment.failed",
        }
    }

    /// Payment status recorded for this kind of event.
    pub fn payment_status(&self) -> PaymentStatus {
        match self {
            Self::Captured => PaymentStatus::Paid,
            Self::Failed => PaymentStatus::Failed,
        }
    }
}

/// Result of classifying a gateway event.
#[derive(Debug, Clone)]
pub enum ClassifiedEvent {
    /// Subscription lifecycle event with a usable subscription entity.
    Subscription {
        kind: SubscriptionEventKind,
        entity: SubscriptionEntity,
        email: Option<String>,
    },
    /// Subscription lifecycle event without a subscription entity id.
    MissingSubscriptionEntity { kind: SubscriptionEventKind },
    /// Payment lifecycle event with a usable payment entity.
    Payment {
        kind: PaymentEventKind,
        entity: PaymentEntity,
        email: Option<String>,
    },
    /// Payment lifecycle event without a payment entity id.
    MissingPaymentEntity { kind: PaymentEventKind },
    /// Any other event type.
    Unhandled { event_type: String },
}

impl ClassifiedEvent {
    /// The event type string this classification was derived from.
    pub fn event_type(&self) -> &str {
        match self {
            Self::Subscription { kind, .. } | Self::MissingSubscriptionEntity { kind } => {
                kind.as_str()
            }
            Self::Payment { kind, .. } | Self::MissingPaymentEntity { kind } => kind.as_str(),
            Self::Unhandled { event_type } => event_type,
        }
    }
}

/// Classifies a decoded event.
pub fn classify(event: GatewayEvent) -> ClassifiedEvent {
    let email = event.notes_email();

    if let Some(kind) = SubscriptionEventKind::from_event_type(event.event_type()) {
        return match event.subscription().filter(|s| s.id().is_some()) {
            Some(entity) => ClassifiedEvent::Subscription {
                kind,
                entity: entity.clone(),
                email,
            },
            None => ClassifiedEvent::MissingSubscriptionEntity { kind },
        };
    }

    if let Some(kind) = PaymentEventKind::from_event_type(event.event_type()) {
        return match event.payment().filter(|p| p.id().is_some()) {
            Some(entity) => ClassifiedEvent::Payment {
                kind,
                entity: entity.clone(),
                email,
            },
            None => ClassifiedEvent::MissingPaymentEntity { kind },
        };
    }

    ClassifiedEvent::Unhandled {
        event_type: event.event.unwrap_or_default(),
    }
}
