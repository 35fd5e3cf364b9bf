//! User entity model and DTOs.

use std::str::FromStr;

use ideaforge_core::error::CoreError;
use ideaforge_core::quota::{QuotaState, SubscriptionTier};
use ideaforge_core::types::{DbId, Timestamp};
use serde::Deserialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub display_name: Option<String>,
    pub role_id: DbId,
    pub subscription_tier: String,
    pub generations_remaining: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Project the quota columns into the domain type.
    pub fn quota_state(&self) -> Result<QuotaState, CoreError> {
        Ok(QuotaState {
            user_id: self.id,
            subscription_tier: SubscriptionTier::from_str(&self.subscription_tier)?,
            generations_remaining: self.generations_remaining,
        })
    }
}

/// DTO for creating a new user. Unset fields take the column defaults
/// (role `user`, tier `free`, one generation).
#[derive(Debug, Default, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub display_name: Option<String>,
    pub role_id: Option<DbId>,
    pub subscription_tier: Option<SubscriptionTier>,
    pub generations_remaining: Option<i32>,
}
