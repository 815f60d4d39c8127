//! In-memory implementation of SubscriptionRepository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::domain::billing::{PaymentUpdate, SubscriptionRecord, SubscriptionUpsert};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::SubscriptionRepository;

/// Subscription records keyed by gateway subscription id.
#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    records: RwLock<HashMap<String, SubscriptionRecord>>,
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record directly, bypassing the call counter.
    pub async fn insert(&self, record: SubscriptionRecord) {
        self.records
            .write()
            .await
            .insert(record.gateway_subscription_id.clone(), record);
    }

    pub async fn get(&self, gateway_subscription_id: &str) -> Option<SubscriptionRecord> {
        self.records.read().await.get(gateway_subscription_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Number of port calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes every subsequent port call fail with a database error.
    pub fn fail_with_database_error(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn enter(&self) -> Result<(), DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::database("subscription store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn upsert(&self, upsert: SubscriptionUpsert) -> Result<SubscriptionRecord, DomainError> {
        self.enter()?;
        let now = Timestamp::now();
        let mut records = self.records.write().await;

        let record = match records.get_mut(&upsert.gateway_subscription_id) {
            Some(existing) => {
                existing.apply_upsert(&upsert, now);
                existing.clone()
            }
            None => {
                let record = SubscriptionRecord::from_upsert(upsert, now);
                records.insert(record.gateway_subscription_id.clone(), record.clone());
                record
            }
        };

        Ok(record)
    }

    async fn assign_owner(
        &self,
        gateway_subscription_id: &str,
        owner: &UserId,
    ) -> Result<(), DomainError> {
        self.enter()?;
        let mut records = self.records.write().await;
        let record = records.get_mut(gateway_subscription_id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::SubscriptionNotFound,
                format!("Subscription not found: {}", gateway_subscription_id),
            )
        })?;
        record.assign_owner(owner.clone(), Timestamp::now());
        Ok(())
    }

    async fn record_payment(
        &self,
        gateway_subscription_id: &str,
        payment: PaymentUpdate,
    ) -> Result<u64, DomainError> {
        self.enter()?;
        let now = Timestamp::now();
        let mut records = self.records.write().await;

        let mut updated = 0;
        for record in records
            .values_mut()
            .filter(|r| r.gateway_subscription_id == gateway_subscription_id)
        {
            record.apply_payment(&payment, now);
            updated += 1;
        }
        Ok(updated)
    }
}
