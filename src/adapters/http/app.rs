//! Full application router.

use axum::{middleware, Router};

use super::billing::{user_routes, webhook_routes, BillingAppState};
use super::middleware::{auth_middleware, AuthState};

/// Builds the stateless router served by the binary and driven by HTTP tests.
///
/// Only the caller-facing routes sit behind the auth middleware; the webhook
/// never sees it. Cross-cutting layers (tracing, request ids, CORS, timeouts)
/// are added by the caller.
pub fn app_router(state: BillingAppState, auth: AuthState) -> Router {
    let authenticated =
        user_routes().route_layer(middleware::from_fn_with_state(auth, auth_middleware));

    Router::new()
        .nest("/api/billing", webhook_routes().merge(authenticated))
        .with_state(state)
}
