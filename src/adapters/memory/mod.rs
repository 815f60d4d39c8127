//! In-memory adapters for development and testing.
//!
//! Every adapter counts its calls so tests can assert that a rejected request
//! touched no storage, and can be switched into a failing mode to exercise
//! storage-error paths.

mod subscription_repository;
mod tier_settings_store;
mod user_repository;

pub use subscription_repository::InMemorySubscriptionRepository;
pub use tier_settings_store::InMemoryTierSettingsStore;
pub use user_repository::InMemoryUserRepository;
