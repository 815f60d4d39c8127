//! Billing view of a user record.
//!
//! Users are owned by the auth provider; the billing core only reads them by
//! email and overwrites their tier.

use serde::{Deserialize, Serialize};

use super::Tier;
use crate::domain::foundation::{Role, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingUser {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    /// Projection of the user's most recent relevant subscription event.
    pub tier: Tier,
}

impl BillingUser {
    pub fn new(id: UserId, email: impl Into<String>, tier: Tier) -> Self {
        Self {
            id,
            email: email.into(),
            role: Role::User,
            tier,
        }
    }
}
