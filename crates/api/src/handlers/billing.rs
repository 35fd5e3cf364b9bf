use axum::extract::State;
use ideaforge_core::providers::CheckoutSession;
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::Json;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /billing/checkout-session`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub price_id: Option<String>,
}

/// POST /api/v1/billing/checkout-session
///
/// Returns `{ "sessionId": ... }` for the client to redirect to.
pub async fn create_checkout_session(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(input): Json<CheckoutRequest>,
) -> AppResult<Json<CheckoutSession>> {
    let session = state
        .checkout
        .create_session(Some(&caller), input.price_id.as_deref())
        .await?;
    Ok(Json(session))
}
