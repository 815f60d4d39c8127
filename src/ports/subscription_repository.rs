//! Subscription repository port.
//!
//! Persists local subscription records keyed by the gateway subscription id.
//!
//! # Design
//!
//! - **Idempotent**: `upsert` and `record_payment` converge on redelivery
//! - **Unique key**: at most one record per gateway subscription id
//! - **No cross-call transactions**: each method is atomic on its own

use async_trait::async_trait;

use crate::domain::billing::{PaymentUpdate, SubscriptionRecord, SubscriptionUpsert};
use crate::domain::foundation::{DomainError, UserId};

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Creates the record for an unseen gateway id, or overwrites tier,
    /// status and period end of the existing one. Returns the stored record.
    ///
    /// New records start with the placeholder owner.
    async fn upsert(&self, upsert: SubscriptionUpsert) -> Result<SubscriptionRecord, DomainError>;

    /// Sets the owner of the record with this gateway id.
    ///
    /// # Errors
    ///
    /// - `SubscriptionNotFound` if no record matches
    /// - `DatabaseError` on persistence failure
    async fn assign_owner(
        &self,
        gateway_subscription_id: &str,
        owner: &UserId,
    ) -> Result<(), DomainError>;

    /// Applies a payment outcome to every record matching the gateway id.
    ///
    /// Returns the number of records updated. Zero matches is not an error.
    async fn record_payment(
        &self,
        gateway_subscription_id: &str,
        payment: PaymentUpdate,
    ) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SubscriptionRepository) {}
    }

    #[test]
    fn subscription_repository_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn SubscriptionRepository>();
    }
}
