//! Billing handlers.
//!
//! ## Commands
//! - Processing gateway webhook deliveries
//! - Creating gateway subscriptions for the authenticated caller
//!
//! `ReconciliationEngine` holds the write logic shared by webhook events.

mod create_subscription;
mod handle_gateway_webhook;
mod reconciliation;

pub use create_subscription::{
    BillingError, CreateSubscriptionCommand, CreateSubscriptionHandler, CreateSubscriptionResult,
    DEFAULT_TOTAL_COUNT,
};
pub use handle_gateway_webhook::{
    HandleGatewayWebhookCommand, HandleGatewayWebhookHandler, HandleGatewayWebhookResult,
};
pub use reconciliation::{
    PaymentReconciliation, ReconciliationEngine, SubscriptionReconciliation, UserTierChange,
};
