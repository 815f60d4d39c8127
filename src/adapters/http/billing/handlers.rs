//! HTTP handlers for billing endpoints.
//!
//! These handlers connect Axum routes to the billing command handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::application::handlers::billing::{
    BillingError, CreateSubscriptionCommand, CreateSubscriptionHandler,
    HandleGatewayWebhookCommand, HandleGatewayWebhookHandler,
};
use crate::domain::billing::WebhookError;

use crate::adapters::http::middleware::RequireAuth;
use super::dto::{
    CreateSubscriptionRequest, CreateSubscriptionResponse, ErrorResponse, MeResponse, WebhookAck,
};

/// Header carrying the gateway's hex HMAC-SHA256 signature.
pub const SIGNATURE_HEADER: &str = "X-Razorpay-Signature";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for billing routes. Handlers are built once at startup.
#[derive(Clone)]
pub struct BillingAppState {
    pub webhook_handler: Arc<HandleGatewayWebhookHandler>,
    pub create_subscription_handler: Arc<CreateSubscriptionHandler>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// `POST /webhook` - Gateway webhook delivery.
///
/// The body is taken as raw bytes so the signature is checked against
/// exactly what the gateway signed.
pub async fn handle_gateway_webhook(
    State(state): State<BillingAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, WebhookApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let result = state
        .webhook_handler
        .handle(HandleGatewayWebhookCommand {
            body: body.to_vec(),
            signature,
        })
        .await?;

    Ok(Json(result.into()))
}

/// `POST /subscriptions` - Start a subscription for the caller.
pub async fn create_subscription(
    State(state): State<BillingAppState>,
    RequireAuth(user): RequireAuth,
    body: Bytes,
) -> Result<Json<CreateSubscriptionResponse>, BillingApiError> {
    let request = CreateSubscriptionRequest::from_body(&body);

    let result = state
        .create_subscription_handler
        .handle(CreateSubscriptionCommand {
            caller: user,
            tier: request.tier.unwrap_or_default(),
        })
        .await?;

    Ok(Json(result.into()))
}

/// `GET /me` - Caller identity and tier.
pub async fn get_me(RequireAuth(user): RequireAuth) -> Json<MeResponse> {
    Json(MeResponse::from(&user))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// Body returned for internal failures. The detail goes to the log only.
const WEBHOOK_FAILURE_MESSAGE: &str = "Webhook processing failed";
const SUBSCRIPTION_FAILURE_MESSAGE: &str = "Subscription creation failed";

/// Converts webhook errors to responses. 4xx stops redelivery, 5xx invites it.
pub struct WebhookApiError(WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        let message = match &self.0 {
            WebhookError::Storage(detail) => {
                tracing::error!(
                    error = %detail,
                    retryable = self.0.is_retryable(),
                    "{}",
                    WEBHOOK_FAILURE_MESSAGE
                );
                WEBHOOK_FAILURE_MESSAGE.to_string()
            }
            WebhookError::MissingSecret => {
                tracing::error!("Webhook secret not configured");
                self.0.to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

pub struct BillingApiError(BillingError);

impl From<BillingError> for BillingApiError {
    fn from(err: BillingError) -> Self {
        Self(err)
    }
}

impl IntoResponse for BillingApiError {
    fn into_response(self) -> Response {
        let message = self.0.to_string();
        match self.0 {
            BillingError::InvalidTier | BillingError::MissingPlanId => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
            }
            BillingError::Gateway {
                status_code, raw, ..
            } => {
                let body = ErrorResponse {
                    error: message,
                    raw: Some(raw),
                    status_code: Some(status_code),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            BillingError::MissingGatewayCredentials => {
                tracing::error!("Razorpay keys not configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(message)),
                )
                    .into_response()
            }
            BillingError::Infrastructure(detail) => {
                tracing::error!(error = %detail, "{}", SUBSCRIPTION_FAILURE_MESSAGE);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(SUBSCRIPTION_FAILURE_MESSAGE)),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn webhook_errors_map_to_gateway_visible_statuses() {
        let cases = [
            (WebhookError::MissingSecret, StatusCode::INTERNAL_SERVER_ERROR),
            (WebhookError::MissingSignature, StatusCode::BAD_REQUEST),
            (WebhookError::InvalidSignature, StatusCode::BAD_REQUEST),
            (WebhookError::ParseError("eof".to_string()), StatusCode::BAD_REQUEST),
            (WebhookError::Storage("down".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(WebhookApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn billing_errors_map_to_statuses() {
        let cases = [
            (BillingError::InvalidTier, StatusCode::BAD_REQUEST),
            (BillingError::MissingPlanId, StatusCode::BAD_REQUEST),
            (BillingError::MissingGatewayCredentials, StatusCode::INTERNAL_SERVER_ERROR),
            (
                BillingError::Gateway {
                    status_code: 400,
                    description: "bad".to_string(),
                    raw: json!({}),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                BillingError::Infrastructure("db".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(BillingApiError::from(err).into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn storage_failure_body_hides_detail() {
        let err = WebhookError::Storage("[DATABASE_ERROR] relation missing".to_string());
        let body = body_json(WebhookApiError::from(err).into_response()).await;
        assert_eq!(body, json!({"error": "Webhook processing failed"}));
    }

    #[tokio::test]
    async fn signature_failure_body_names_the_failure() {
        let body = body_json(WebhookApiError::from(WebhookError::InvalidSignature).into_response()).await;
        assert_eq!(body, json!({"error": "Invalid signature"}));
    }

    #[tokio::test]
    async fn infrastructure_failure_body_hides_detail() {
        let err = BillingError::Infrastructure("pool timed out".to_string());
        let body = body_json(BillingApiError::from(err).into_response()).await;
        assert_eq!(body, json!({"error": "Subscription creation failed"}));
    }
}
