//! In-memory implementation of TierSettingsStore.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::domain::billing::TierSettings;
use crate::domain::foundation::DomainError;
use crate::ports::TierSettingsStore;

#[derive(Default)]
pub struct InMemoryTierSettingsStore {
    settings: RwLock<Option<TierSettings>>,
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl InMemoryTierSettingsStore {
    /// Empty store; the first read creates default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: TierSettings) -> Self {
        Self {
            settings: RwLock::new(Some(settings)),
            ..Self::default()
        }
    }

    /// Replaces the stored settings, as an admin edit would.
    pub async fn set(&self, settings: TierSettings) {
        *self.settings.write().await = Some(settings);
    }

    pub async fn is_created(&self) -> bool {
        self.settings.read().await.is_some()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_with_database_error(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl TierSettingsStore for InMemoryTierSettingsStore {
    async fn get_or_create(&self) -> Result<TierSettings, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::database("settings store unavailable"));
        }
        let mut settings = self.settings.write().await;
        Ok(settings.get_or_insert_with(TierSettings::default).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_read_creates_defaults() {
        let store = InMemoryTierSettingsStore::new();
        assert!(!store.is_created().await);

        let settings = store.get_or_create().await.unwrap();

        assert_eq!(settings, TierSettings::default());
        assert!(store.is_created().await);
    }

    #[tokio::test]
    async fn existing_settings_are_returned_unchanged() {
        let configured = TierSettings {
            basic_plan_id: Some("plan_basic".to_string()),
            ..Default::default()
        };
        let store = InMemoryTierSettingsStore::with_settings(configured.clone());

        assert_eq!(store.get_or_create().await.unwrap(), configured);
    }
}
