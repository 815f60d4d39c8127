//! Read-through cache for the tier settings singleton.
//!
//! Settings change rarely (admin edits) but are read on every webhook, so the
//! inner store is consulted at most once per TTL. The first read goes through
//! to the inner store and thereby creates the singleton if it is missing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::domain::billing::TierSettings;
use crate::domain::foundation::DomainError;
use crate::ports::TierSettingsStore;

/// Default time a cached copy is served before re-reading.
pub const DEFAULT_SETTINGS_TTL: Duration = Duration::from_secs(60);

/// Cached settings with expiry tracking.
struct CachedSettings {
    settings: TierSettings,
    fetched_at: Instant,
}

impl CachedSettings {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() >= ttl
    }
}

/// Caching decorator over any [`TierSettingsStore`].
///
/// A zero TTL disables caching.
pub struct CachedTierSettingsStore {
    inner: Arc<dyn TierSettingsStore>,
    ttl: Duration,
    cache: RwLock<Option<CachedSettings>>,
}

impl CachedTierSettingsStore {
    pub fn new(inner: Arc<dyn TierSettingsStore>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cache: RwLock::new(None),
        }
    }

    pub fn with_default_ttl(inner: Arc<dyn TierSettingsStore>) -> Self {
        Self::new(inner, DEFAULT_SETTINGS_TTL)
    }

    /// Drops the cached copy so the next read goes to the inner store.
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }
}

#[async_trait]
impl TierSettingsStore for CachedTierSettingsStore {
    async fn get_or_create(&self) -> Result<TierSettings, DomainError> {
        if self.ttl.is_zero() {
            return self.inner.get_or_create().await;
        }

        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref().filter(|c| !c.is_expired(self.ttl)) {
                return Ok(cached.settings.clone());
            }
        }

        let mut cache = self.cache.write().await;
        // Another task may have refreshed while we waited for the write lock.
        if let Some(cached) = cache.as_ref().filter(|c| !c.is_expired(self.ttl)) {
            return Ok(cached.settings.clone());
        }

        let settings = self.inner.get_or_create().await?;
        tracing::debug!(
            basic_plan_configured = settings.basic_plan_id.is_some(),
            pro_plan_configured = settings.pro_plan_id.is_some(),
            "Tier settings cache refreshed"
        );
        *cache = Some(CachedSettings {
            settings: settings.clone(),
            fetched_at: Instant::now(),
        });
        Ok(settings)
    }
}
