//! User repository port.
//!
//! Users are owned by the auth provider. Billing only looks them up by email
//! and overwrites their tier.

use async_trait::async_trait;

use crate::domain::billing::{BillingUser, Tier};
use crate::domain::foundation::{DomainError, UserId};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by exact email. Returns `None` if no user matches.
    async fn find_by_email(&self, email: &str) -> Result<Option<BillingUser>, DomainError>;

    /// Overwrites the user's tier.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the user doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update_tier(&self, user_id: &UserId, tier: Tier) -> Result<(), DomainError>;
}
