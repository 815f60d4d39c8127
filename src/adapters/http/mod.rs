//! HTTP adapters - REST API implementations.

mod app;
pub mod billing;
pub mod middleware;

pub use app::app_router;
pub use billing::BillingAppState;
pub use middleware::{auth_middleware, AuthState, RequireAuth};
