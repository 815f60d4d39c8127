//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresSubscriptionRepository` - Subscription records, upserted by gateway id
//! - `PostgresUserRepository` - User lookup by email and tier writes
//! - `PostgresTierSettingsStore` - Singleton settings row, created on first read

mod subscription_repository;
mod tier_settings_store;
mod user_repository;

pub use subscription_repository::PostgresSubscriptionRepository;
pub use tier_settings_store::PostgresTierSettingsStore;
pub use user_repository::PostgresUserRepository;
