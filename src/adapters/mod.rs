//! Adapters - Implementations of port interfaces.
//!
//! - `auth` - JWT session validation (plus a mock for tests)
//! - `http` - axum routes, DTOs and middleware
//! - `memory` - In-memory storage for development and tests
//! - `postgres` - sqlx-backed storage
//! - `razorpay` - Payment gateway REST client (plus a mock)
//! - `settings` - Cached tier settings accessor

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod razorpay;
pub mod settings;

pub use auth::{JwtConfig, JwtSessionValidator, MockSessionValidator};
pub use memory::{InMemorySubscriptionRepository, InMemoryTierSettingsStore, InMemoryUserRepository};
pub use postgres::{PostgresSubscriptionRepository, PostgresTierSettingsStore, PostgresUserRepository};
pub use razorpay::{MockPaymentGateway, RazorpayConfig, RazorpayGateway};
pub use settings::CachedTierSettingsStore;
