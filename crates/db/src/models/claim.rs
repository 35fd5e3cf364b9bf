//! Custom claim rows attached to users.

use ideaforge_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `user_claims` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserClaim {
    pub id: DbId,
    pub user_id: DbId,
    pub claim_key: String,
    pub claim_value: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
