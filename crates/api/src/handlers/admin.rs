//! Handlers for the `/admin` resource.
//!
//! Authorization is decided by the core policy, so a signed-in non-admin
//! gets `permission-denied` rather than a routing error.

use axum::extract::State;
use ideaforge_core::policy::{authorize, Capability};
use ideaforge_core::quota::{QuotaState, SubscriptionTier};
use ideaforge_core::types::DbId;
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::{Json, Path};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Request body for `POST /admin/creators`.
#[derive(Debug, Deserialize)]
pub struct SetCreatorRoleRequest {
    pub email: Option<serde_json::Value>,
}

/// Request body for `PUT /admin/users/{id}/subscription`.
#[derive(Debug, Deserialize)]
pub struct UpdateSubscriptionRequest {
    pub tier: String,
}

/// POST /api/v1/admin/creators
///
/// Grant the `creator` claim to the account registered under `email`.
pub async fn set_creator_role(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(input): Json<SetCreatorRoleRequest>,
) -> AppResult<Json<MessageResponse>> {
    let email = input.email.as_ref().and_then(serde_json::Value::as_str);
    let message = state
        .role_authority
        .grant_creator_role(Some(&caller), email)
        .await?;
    Ok(Json(MessageResponse { message }))
}

/// PUT /api/v1/admin/users/{id}/subscription
///
/// Move a user between the `free` and `paid` tiers.
pub async fn update_subscription(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(user_id): Path<DbId>,
    Json(input): Json<UpdateSubscriptionRequest>,
) -> AppResult<Json<DataResponse<QuotaState>>> {
    let admin = authorize(Some(&caller), Capability::ManageSubscriptions)?;
    let tier: SubscriptionTier = input.tier.trim().parse()?;

    let quota = state.ledger().set_tier(user_id, tier).await?;
    tracing::info!(admin_id = admin.user_id, user_id, tier = %tier, "Subscription tier updated");
    Ok(Json(DataResponse { data: quota }))
}
