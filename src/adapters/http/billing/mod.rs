//! HTTP adapter for billing endpoints.
//!
//! - `POST /api/billing/webhook` - Gateway webhook deliveries
//! - `POST /api/billing/subscriptions` - Start a subscription for the caller
//! - `GET /api/billing/me` - Caller identity and tier

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{BillingAppState, SIGNATURE_HEADER};
pub use routes::{user_routes, webhook_routes};
