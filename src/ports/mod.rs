//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `SubscriptionRepository` - Subscription records keyed by gateway id
//! - `UserRepository` - User lookup by email and tier writes
//! - `TierSettingsStore` - Singleton plan configuration
//!
//! ## External Service Ports
//!
//! - `PaymentGateway` - Subscription creation at the payment gateway
//! - `SessionValidator` - Bearer token validation

mod payment_gateway;
mod session_validator;
mod subscription_repository;
mod tier_settings_store;
mod user_repository;

pub use payment_gateway::{
    CreateGatewaySubscription, GatewayError, GatewaySubscription, PaymentGateway,
    SubscriptionNotes,
};
pub use session_validator::SessionValidator;
pub use subscription_repository::SubscriptionRepository;
pub use tier_settings_store::TierSettingsStore;
pub use user_repository::UserRepository;
