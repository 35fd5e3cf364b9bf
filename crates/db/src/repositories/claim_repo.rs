//! Repository for the `user_claims` table.

use ideaforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::claim::UserClaim;

const COLUMNS: &str = "id, user_id, claim_key, claim_value, created_at, updated_at";

pub struct ClaimRepo;

impl ClaimRepo {
    /// Insert or overwrite the claim `key` for `user_id`.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<UserClaim, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_claims (user_id, claim_key, claim_value)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_user_claims_user_key
             DO UPDATE SET claim_value = EXCLUDED.claim_value
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserClaim>(&query)
            .bind(user_id)
            .bind(key)
            .bind(value)
            .fetch_one(pool)
            .await
    }

    /// All claims of a user, ordered by key.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<UserClaim>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM user_claims WHERE user_id = $1 ORDER BY claim_key");
        sqlx::query_as::<_, UserClaim>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
