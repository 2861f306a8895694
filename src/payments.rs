use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;

const CHECKOUT_SESSIONS_URL: &str = "https://api.stripe.com/v1/checkout/sessions";

/// One priced entry sent to the payment provider. `unit_amount` is in
/// currency minor units (price × 100, truncated) to avoid floating-point
/// drift downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub name: String,
    pub unit_amount: i64,
}

/// Fully assembled hosted-checkout request.
#[derive(Debug, Clone)]
pub struct CheckoutSessionRequest {
    pub line_items: Vec<LineItem>,
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
    pub customer_email: Option<String>,
    pub metadata: Vec<(String, String)>,
}

/// Seam for the external payment provider, so checkout assembly can be
/// exercised without network access.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// Creates a hosted checkout session and returns the provider session id.
    async fn create_session(&self, request: &CheckoutSessionRequest) -> Result<String, ServiceError>;
}

/// Stripe configuration
#[derive(Clone)]
pub struct StripeConfig {
    pub secret_key: String,
}

/// Stripe-backed gateway: form-encoded calls against the Checkout Sessions
/// API with basic auth on the secret key.
#[derive(Clone)]
pub struct StripeGateway {
    config: StripeConfig,
    client: reqwest::Client,
}

impl StripeGateway {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CheckoutGateway for StripeGateway {
    #[instrument(skip(self, request))]
    async fn create_session(&self, request: &CheckoutSessionRequest) -> Result<String, ServiceError> {
        let params = session_params(request);

        let response = self
            .client
            .post(CHECKOUT_SESSIONS_URL)
            .basic_auth(&self.config.secret_key, Some(""))
            .form(&params)
            .send()
            .await
            .map_err(|e| ServiceError::InternalError(format!("Stripe API error: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Stripe rejected checkout session: {}", error_text);
            return Err(ServiceError::PaymentProvider(extract_stripe_message(
                &error_text,
            )));
        }

        let session: CheckoutSessionResponse = response.json().await.map_err(|e| {
            ServiceError::SerializationError(format!("Failed to parse Stripe response: {}", e))
        })?;

        info!(session_id = %session.id, "Stripe checkout session created");
        Ok(session.id)
    }
}

/// Placeholder gateway used when no Stripe key is configured: it fails with
/// a clear error instead of hitting the API with empty credentials.
pub struct UnconfiguredGateway;

#[async_trait]
impl CheckoutGateway for UnconfiguredGateway {
    async fn create_session(
        &self,
        _request: &CheckoutSessionRequest,
    ) -> Result<String, ServiceError> {
        Err(ServiceError::InternalError(
            "stripe_secret_key is not configured".to_string(),
        ))
    }
}

#[derive(Debug, Deserialize)]
struct CheckoutSessionResponse {
    id: String,
}

/// Flattens the request into Stripe's `a[b][c]=v` form encoding.
fn session_params(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
    ];

    for (i, item) in request.line_items.iter().enumerate() {
        params.push((
            format!("line_items[{}][price_data][currency]", i),
            request.currency.clone(),
        ));
        params.push((
            format!("line_items[{}][price_data][product_data][name]", i),
            item.name.clone(),
        ));
        params.push((
            format!("line_items[{}][price_data][unit_amount]", i),
            item.unit_amount.to_string(),
        ));
        params.push((format!("line_items[{}][quantity]", i), "1".to_string()));
    }

    if let Some(email) = &request.customer_email {
        params.push(("customer_email".to_string(), email.clone()));
    }

    for (key, value) in &request.metadata {
        params.push((format!("metadata[{}]", key), value.clone()));
    }

    params
}

/// Pulls `error.message` out of a Stripe error body, falling back to the
/// raw text when the body is not the expected shape.
fn extract_stripe_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}
