//! Tier Billing - recurring subscription billing for a tiered web app.
//!
//! Receives payment gateway webhooks, verifies their HMAC signatures,
//! classifies lifecycle events and reconciles local subscription and user
//! tier records. Also starts gateway subscriptions for authenticated users.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
