//! Stripe Checkout session creation for subscription purchases.

use async_trait::async_trait;
use ideaforge_core::providers::{CheckoutSession, PaymentProvider, ProviderError};
use ideaforge_core::types::DbId;
use serde::Deserialize;

use crate::error::{ensure_success, ClientError};

#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    pub secret_key: String,
    pub api_url: String,
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                | Default                                  |
    /// |------------------------|------------------------------------------|
    /// | `STRIPE_SECRET_KEY`    | required                                 |
    /// | `STRIPE_API_URL`       | `https://api.stripe.com`                 |
    /// | `CHECKOUT_SUCCESS_URL` | `http://localhost:5173/checkout/success` |
    /// | `CHECKOUT_CANCEL_URL`  | `http://localhost:5173/checkout/cancel`  |
    pub fn from_env() -> Self {
        let secret_key = std::env::var("STRIPE_SECRET_KEY").expect("STRIPE_SECRET_KEY must be set");
        let api_url =
            std::env::var("STRIPE_API_URL").unwrap_or_else(|_| "https://api.stripe.com".into());
        let success_url = std::env::var("CHECKOUT_SUCCESS_URL")
            .unwrap_or_else(|_| "http://localhost:5173/checkout/success".into());
        let cancel_url = std::env::var("CHECKOUT_CANCEL_URL")
            .unwrap_or_else(|_| "http://localhost:5173/checkout/cancel".into());

        Self {
            secret_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            success_url,
            cancel_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
}

/// Form fields for a one-item subscription checkout.
fn session_form(config: &CheckoutConfig, price_id: &str, user_id: DbId) -> Vec<(&'static str, String)> {
    vec![
        ("mode", "subscription".to_string()),
        ("line_items[0][price]", price_id.to_string()),
        ("line_items[0][quantity]", "1".to_string()),
        ("success_url", config.success_url.clone()),
        ("cancel_url", config.cancel_url.clone()),
        ("client_reference_id", user_id.to_string()),
    ]
}

pub struct StripeCheckout {
    client: reqwest::Client,
    config: CheckoutConfig,
}

impl StripeCheckout {
    pub fn new(config: CheckoutConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn create_session(&self, price_id: &str, user_id: DbId) -> Result<String, ClientError> {
        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.config.api_url))
            .bearer_auth(&self.config.secret_key)
            .form(&session_form(&self.config, price_id, user_id))
            .send()
            .await?;

        let session: SessionResponse = ensure_success(response).await?.json().await?;
        Ok(session.id)
    }
}

#[async_trait]
impl PaymentProvider for StripeCheckout {
    async fn create_checkout_session(
        &self,
        price_id: &str,
        user_id: DbId,
    ) -> Result<CheckoutSession, ProviderError> {
        let session_id = self.create_session(price_id, user_id).await.map_err(|e| {
            tracing::error!(user_id, price_id, error = %e, "Checkout session creation failed");
            ProviderError::from(e)
        })?;
        tracing::info!(user_id, price_id, session_id = %session_id, "Checkout session created");
        Ok(CheckoutSession { session_id })
    }
}
