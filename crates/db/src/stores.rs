//! PostgreSQL-backed implementations of the core provider traits.

use async_trait::async_trait;
use ideaforge_core::idea::IdeaRecord;
use ideaforge_core::providers::{CatalogStore, IdentityProvider, ProviderError, QuotaStore};
use ideaforge_core::quota::{QuotaState, SubscriptionTier};
use ideaforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::User;
use crate::repositories::{ClaimRepo, IdeaRepo, UserRepo};

fn storage(err: sqlx::Error) -> ProviderError {
    ProviderError::Storage(err.to_string())
}

fn quota_state(user: &User) -> Result<QuotaState, ProviderError> {
    user.quota_state()
        .map_err(|e| ProviderError::Storage(format!("user {}: {e}", user.id)))
}

/// Quota columns of the `users` table.
#[derive(Clone)]
pub struct PgQuotaStore {
    pool: PgPool,
}

impl PgQuotaStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuotaStore for PgQuotaStore {
    async fn get(&self, user_id: DbId) -> Result<Option<QuotaState>, ProviderError> {
        UserRepo::find_by_id(&self.pool, user_id)
            .await
            .map_err(storage)?
            .as_ref()
            .map(quota_state)
            .transpose()
    }

    async fn try_decrement(&self, user_id: DbId) -> Result<bool, ProviderError> {
        UserRepo::try_decrement_generation(&self.pool, user_id)
            .await
            .map_err(storage)
    }

    async fn list_user_ids_by_tier(
        &self,
        tier: SubscriptionTier,
    ) -> Result<Vec<DbId>, ProviderError> {
        UserRepo::list_ids_by_tier(&self.pool, tier)
            .await
            .map_err(storage)
    }

    async fn reset_batch(
        &self,
        user_ids: &[DbId],
        tier: SubscriptionTier,
        value: i32,
    ) -> Result<u64, ProviderError> {
        UserRepo::reset_generations(&self.pool, user_ids, tier, value)
            .await
            .map_err(storage)
    }

    async fn set_tier(
        &self,
        user_id: DbId,
        tier: SubscriptionTier,
    ) -> Result<Option<QuotaState>, ProviderError> {
        UserRepo::set_tier(&self.pool, user_id, tier)
            .await
            .map_err(storage)?
            .as_ref()
            .map(quota_state)
            .transpose()
    }
}

/// The `ideas` table.
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn upsert(&self, record: &IdeaRecord) -> Result<(), ProviderError> {
        IdeaRepo::upsert(&self.pool, record).await.map_err(storage)?;
        Ok(())
    }
}

/// Accounts in `users` with claims in `user_claims`.
#[derive(Clone)]
pub struct PgIdentityProvider {
    pool: PgPool,
}

impl PgIdentityProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityProvider for PgIdentityProvider {
    async fn resolve_by_email(&self, email: &str) -> Result<Option<DbId>, ProviderError> {
        Ok(UserRepo::find_by_email(&self.pool, email)
            .await
            .map_err(storage)?
            .map(|u| u.id))
    }

    async fn set_claim(&self, user_id: DbId, key: &str, value: bool) -> Result<(), ProviderError> {
        ClaimRepo::upsert(&self.pool, user_id, key, &serde_json::Value::Bool(value))
            .await
            .map_err(storage)?;
        Ok(())
    }
}
