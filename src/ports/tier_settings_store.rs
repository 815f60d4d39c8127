//! Tier settings port.

use async_trait::async_trait;

use crate::domain::billing::TierSettings;
use crate::domain::foundation::DomainError;

/// Access to the singleton tier settings record.
#[async_trait]
pub trait TierSettingsStore: Send + Sync {
    /// Returns the settings, creating the record with defaults if absent.
    async fn get_or_create(&self) -> Result<TierSettings, DomainError>;
}
