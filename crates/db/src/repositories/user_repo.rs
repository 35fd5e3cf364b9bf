//! Repository for the `users` table, including the quota columns.

use ideaforge_core::quota::SubscriptionTier;
use ideaforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, display_name, role_id, subscription_tier, \
                        generations_remaining, is_active, created_at, updated_at";

/// Provides user lookups and quota bookkeeping.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, display_name, role_id, subscription_tier, generations_remaining)
             VALUES ($1, $2, COALESCE($3, 2), COALESCE($4, 'free'), COALESCE($5, 1))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.display_name)
            .bind(input.role_id)
            .bind(input.subscription_tier.map(SubscriptionTier::as_str))
            .bind(input.generations_remaining)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active user by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE lower(email) = lower($1) AND is_active = true"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Spend one generation for a free-tier user with a positive balance.
    ///
    /// The guard and the decrement are one statement, so concurrent callers
    /// cannot drive the balance below zero. Returns `true` if a row changed.
    pub async fn try_decrement_generation(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET generations_remaining = generations_remaining - 1
             WHERE id = $1 AND subscription_tier = 'free' AND generations_remaining > 0",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// IDs of all active users on `tier`, ascending.
    pub async fn list_ids_by_tier(
        pool: &PgPool,
        tier: SubscriptionTier,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM users WHERE subscription_tier = $1 AND is_active = true ORDER BY id",
        )
        .bind(tier.as_str())
        .fetch_all(pool)
        .await
    }

    /// Set `generations_remaining = value` for every listed user still on `tier`.
    ///
    /// Users whose tier changed since the IDs were listed are left alone.
    pub async fn reset_generations(
        pool: &PgPool,
        ids: &[DbId],
        tier: SubscriptionTier,
        value: i32,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET generations_remaining = $3
             WHERE id = ANY($1) AND subscription_tier = $2",
        )
        .bind(ids)
        .bind(tier.as_str())
        .bind(value)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Change a user's subscription tier. Returns `None` if the user does not exist.
    pub async fn set_tier(
        pool: &PgPool,
        id: DbId,
        tier: SubscriptionTier,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET subscription_tier = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(tier.as_str())
            .fetch_optional(pool)
            .await
    }
}
