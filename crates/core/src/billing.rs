//! Subscription checkout.

use std::sync::Arc;

use crate::error::CoreError;
use crate::policy::{authorize, Caller, Capability};
use crate::providers::{CheckoutSession, PaymentProvider};

/// Starts hosted checkout sessions with the payment provider.
pub struct CheckoutService {
    payments: Arc<dyn PaymentProvider>,
}

impl CheckoutService {
    pub fn new(payments: Arc<dyn PaymentProvider>) -> Self {
        Self { payments }
    }

    /// Create a checkout session for `price_id` on behalf of `caller`.
    pub async fn create_session(
        &self,
        caller: Option<&Caller>,
        price_id: Option<&str>,
    ) -> Result<CheckoutSession, CoreError> {
        let caller = authorize(caller, Capability::StartCheckout)?;

        let price_id = price_id.map(str::trim).unwrap_or_default();
        if price_id.is_empty() {
            return Err(CoreError::Validation(
                "The function must be called with a 'priceId' argument.".into(),
            ));
        }

        self.payments
            .create_checkout_session(price_id, caller.user_id)
            .await
            .map_err(|e| {
                tracing::error!(user_id = caller.user_id, price_id, error = %e, "Checkout failed");
                CoreError::Internal("Unable to create checkout session".into())
            })
    }
}
