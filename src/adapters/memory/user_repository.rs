//! In-memory implementation of UserRepository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::domain::billing::{BillingUser, Tier};
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::UserRepository;

/// Users keyed by id.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, BillingUser>>,
    calls: AtomicUsize,
    tier_writes: AtomicUsize,
    fail: AtomicBool,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding the given users.
    pub fn with_users(users: impl IntoIterator<Item = BillingUser>) -> Self {
        let users = users.into_iter().map(|u| (u.id.clone(), u)).collect();
        Self {
            users: RwLock::new(users),
            ..Self::default()
        }
    }

    pub async fn get(&self, id: &UserId) -> Option<BillingUser> {
        self.users.read().await.get(id).cloned()
    }

    /// Number of port calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of successful `update_tier` calls.
    pub fn tier_write_count(&self) -> usize {
        self.tier_writes.load(Ordering::SeqCst)
    }

    pub fn fail_with_database_error(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn enter(&self) -> Result<(), DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::database("user store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<BillingUser>, DomainError> {
        self.enter()?;
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_tier(&self, user_id: &UserId, tier: Tier) -> Result<(), DomainError> {
        self.enter()?;
        let mut users = self.users.write().await;
        let user = users.get_mut(user_id).ok_or_else(|| {
            DomainError::new(ErrorCode::UserNotFound, format!("User not found: {}", user_id))
        })?;
        user.tier = tier;
        self.tier_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
