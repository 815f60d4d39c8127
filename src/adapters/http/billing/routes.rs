//! Axum router configuration for billing endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{create_subscription, get_me, handle_gateway_webhook, BillingAppState};

/// Gateway-facing routes. Authenticated by signature only.
///
/// - `POST /webhook` - Gateway webhook deliveries
pub fn webhook_routes() -> Router<BillingAppState> {
    Router::new().route("/webhook", post(handle_gateway_webhook))
}

/// Caller-facing routes. Mount behind `auth_middleware`.
///
/// - `POST /subscriptions` - Start a subscription
/// - `GET /me` - Caller identity and tier
pub fn user_routes() -> Router<BillingAppState> {
    Router::new()
        .route("/subscriptions", post(create_subscription))
        .route("/me", get(get_me))
}
