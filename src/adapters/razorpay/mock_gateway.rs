//! Mock payment gateway for testing.
//!
//! Records every request and returns either a configured subscription or a
//! configured error.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::ports::{CreateGatewaySubscription, GatewayError, GatewaySubscription, PaymentGateway};

#[derive(Default)]
pub struct MockPaymentGateway {
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    response: Option<GatewaySubscription>,
    error: Option<GatewayError>,
    requests: Vec<CreateGatewaySubscription>,
}

impl MockPaymentGateway {
    /// A gateway that answers with a `created` subscription `sub_mock`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, response: GatewaySubscription) -> Self {
        self.lock().response = Some(response);
        self
    }

    pub fn with_error(self, error: GatewayError) -> Self {
        self.lock().error = Some(error);
        self
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<CreateGatewaySubscription> {
        self.lock().requests.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A poisoned lock only means another test thread panicked mid-call.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_subscription(
        &self,
        request: CreateGatewaySubscription,
    ) -> Result<GatewaySubscription, GatewayError> {
        let mut state = self.lock();
        state.requests.push(request.clone());

        if let Some(error) = state.error.clone() {
            return Err(error);
        }

        Ok(state.response.clone().unwrap_or_else(|| GatewaySubscription {
            id: "sub_mock".to_string(),
            status: Some("created".to_string()),
            short_url: Some("https://rzp.io/i/mock".to_string()),
            plan_id: Some(request.plan_id),
        }))
    }
}
