//! Settings adapters.

mod cached;

pub use cached::CachedTierSettingsStore;
