//! Shared domain primitives: identifiers, timestamps, errors, caller identity.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser, Role};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{SubscriptionRecordId, UserId};
pub use timestamp::Timestamp;
