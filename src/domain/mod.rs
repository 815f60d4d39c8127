//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, caller identity)
//! - `billing` - Tiers, subscriptions, webhook verification and event classification

pub mod billing;
pub mod foundation;
