//! Billing domain module.
//!
//! Webhook verification, event classification, plan-to-tier resolution and
//! the records that reconciliation writes.
//!
//! # Module Structure
//!
//! - `tier` - Tier levels granted to users
//! - `tier_settings` - Plan configuration and the plan-to-tier resolver
//! - `tier_policy` - Status-to-tier decision
//! - `subscription` - Local subscription record
//! - `gateway_event` - Decoded webhook payload
//! - `event_classifier` - Buckets events into subscription, payment or unhandled
//! - `webhook_verifier` - HMAC-SHA256 signature check

mod event_classifier;
mod gateway_event;
mod subscription;
mod tier;
mod tier_policy;
mod tier_settings;
mod user;
mod webhook_errors;
mod webhook_verifier;

pub use event_classifier::{classify, ClassifiedEvent, PaymentEventKind, SubscriptionEventKind};
pub use gateway_event::{
    EntityEnvelope, EventPayload, GatewayEvent, PaymentEntity, SubscriptionEntity,
    EMAIL_NOTE_KEYS,
};
pub use subscription::{
    PaymentStatus, PaymentUpdate, SubscriptionRecord, SubscriptionUpsert, ACTIVE_STATUS,
};
pub use tier::Tier;
pub use tier_policy::TierDecision;
pub use tier_settings::{TierSettings, TIER_SETTINGS_ID};
pub use user::BillingUser;
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{compute_signature, verify_signature, WebhookVerifier};
