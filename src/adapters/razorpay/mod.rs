//! Razorpay payment gateway adapters.
//!
//! - `RazorpayGateway` - REST client for the subscriptions API
//! - `MockPaymentGateway` - Configurable mock for tests

mod mock_gateway;
mod razorpay_adapter;

pub use mock_gateway::MockPaymentGateway;
pub use razorpay_adapter::{RazorpayConfig, RazorpayGateway, DEFAULT_API_BASE_URL};
