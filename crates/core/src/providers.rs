//! Traits for the external collaborators the services depend on.
//!
//! Concrete implementations live outside `core`: PostgreSQL adapters in
//! `ideaforge-db`, HTTP clients in `ideaforge-clients`. Services receive them as
//! `Arc<dyn Trait>` at construction so tests can substitute in-memory fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::idea::IdeaRecord;
use crate::quota::{QuotaState, SubscriptionTier};
use crate::types::DbId;

/// Failure reported by any provider implementation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// The remote call did not complete within its deadline.
    #[error("request timed out")]
    Timeout,

    /// The remote service could not be reached or rejected the request.
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    /// A persistence read or write failed.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Persistence and identity failures surface as internal errors; callers
/// that need a different kind (e.g. backend dispatch) map explicitly.
impl From<ProviderError> for CoreError {
    fn from(err: ProviderError) -> Self {
        CoreError::Internal(err.to_string())
    }
}

/// Text-generation backend (an LLM endpoint).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Send `prompt` and return the raw text reply.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Persisted per-user quota state.
#[async_trait]
pub trait QuotaStore: Send + Sync {
    async fn get(&self, user_id: DbId) -> Result<Option<QuotaState>, ProviderError>;

    /// Atomically decrement `generations_remaining` for a free-tier user if it
    /// is still positive. Returns `false` when no row qualified.
    async fn try_decrement(&self, user_id: DbId) -> Result<bool, ProviderError>;

    async fn list_user_ids_by_tier(&self, tier: SubscriptionTier)
        -> Result<Vec<DbId>, ProviderError>;

    /// Set `generations_remaining = value` for the given ids that still belong
    /// to `tier`, as one all-or-nothing update. Returns the rows updated.
    async fn reset_batch(
        &self,
        user_ids: &[DbId],
        tier: SubscriptionTier,
        value: i32,
    ) -> Result<u64, ProviderError>;

    async fn set_tier(
        &self,
        user_id: DbId,
        tier: SubscriptionTier,
    ) -> Result<Option<QuotaState>, ProviderError>;
}

/// The public idea catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Insert or overwrite the entry keyed by `record.name`.
    async fn upsert(&self, record: &IdeaRecord) -> Result<(), ProviderError>;
}

/// Identity provider: resolves accounts and stores custom claims.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve an email address to the account id, `None` if unknown.
    async fn resolve_by_email(&self, email: &str) -> Result<Option<DbId>, ProviderError>;

    async fn set_claim(&self, user_id: DbId, key: &str, value: bool) -> Result<(), ProviderError>;
}

/// A candidate post pulled from the external idea feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePost {
    pub title: String,
    pub body: String,
}

/// External feed of candidate posts.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Label stored as `source` on catalog entries classified from this feed.
    fn origin_label(&self) -> &str;

    /// Fetch at most `limit` recent posts.
    async fn fetch_posts(&self, limit: usize) -> Result<Vec<SourcePost>, ProviderError>;
}

/// Handle returned by the payment provider for a new checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub session_id: String,
}

/// Payment provider that hosts subscription checkout pages.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_checkout_session(
        &self,
        price_id: &str,
        user_id: DbId,
    ) -> Result<CheckoutSession, ProviderError>;
}
