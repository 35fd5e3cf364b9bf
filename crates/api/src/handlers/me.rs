//! Handlers for the caller's own account.

use std::collections::BTreeMap;

use axum::extract::State;
use ideaforge_core::policy::{authorize, Capability};
use ideaforge_core::quota::QuotaState;
use ideaforge_db::repositories::ClaimRepo;

use crate::error::AppResult;
use crate::extract::Json;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/me/quota
pub async fn get_quota(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> AppResult<Json<DataResponse<QuotaState>>> {
    let caller = authorize(Some(&caller), Capability::ViewOwnAccount)?;
    let quota = state.ledger().status(caller.user_id).await?;
    Ok(Json(DataResponse { data: quota }))
}

/// GET /api/v1/me/claims
///
/// Custom claims as stored, keyed by claim name. Reflects a creator grant
/// immediately, before the caller's token is reissued.
pub async fn get_claims(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> AppResult<Json<DataResponse<BTreeMap<String, serde_json::Value>>>> {
    let caller = authorize(Some(&caller), Capability::ViewOwnAccount)?;
    let claims = ClaimRepo::list_for_user(&state.pool, caller.user_id)
        .await?
        .into_iter()
        .map(|c| (c.claim_key, c.claim_value))
        .collect();
    Ok(Json(DataResponse { data: claims }))
}
