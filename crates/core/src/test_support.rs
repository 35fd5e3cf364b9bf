//! In-memory provider fakes for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Barrier;

use crate::idea::IdeaRecord;
use crate::providers::{
    CatalogStore, CheckoutSession, FeedSource, GenerationBackend, IdentityProvider,
    PaymentProvider, ProviderError, QuotaStore, SourcePost,
};
use crate::quota::{QuotaState, SubscriptionTier};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Quota
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryQuotaStore {
    rows: Mutex<HashMap<DbId, (SubscriptionTier, i32)>>,
    failing_ids: Mutex<HashSet<DbId>>,
}

impl InMemoryQuotaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user_id: DbId, tier: SubscriptionTier, remaining: i32) {
        self.rows.lock().unwrap().insert(user_id, (tier, remaining));
    }

    pub fn remaining(&self, user_id: DbId) -> Option<i32> {
        self.rows.lock().unwrap().get(&user_id).map(|(_, r)| *r)
    }

    /// Make any `reset_batch` call that includes `user_id` fail.
    pub fn fail_batches_containing(&self, user_id: DbId) {
        self.failing_ids.lock().unwrap().insert(user_id);
    }
}

#[async_trait]
impl QuotaStore for InMemoryQuotaStore {
    async fn get(&self, user_id: DbId) -> Result<Option<QuotaState>, ProviderError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&user_id)
            .map(|(tier, remaining)| QuotaState {
                user_id,
                subscription_tier: *tier,
                generations_remaining: *remaining,
            }))
    }

    async fn try_decrement(&self, user_id: DbId) -> Result<bool, ProviderError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&user_id) {
            Some((SubscriptionTier::Free, remaining)) if *remaining > 0 => {
                *remaining -= 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_user_ids_by_tier(
        &self,
        tier: SubscriptionTier,
    ) -> Result<Vec<DbId>, ProviderError> {
        let mut ids: Vec<DbId> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, (t, _))| *t == tier)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn reset_batch(
        &self,
        user_ids: &[DbId],
        tier: SubscriptionTier,
        value: i32,
    ) -> Result<u64, ProviderError> {
        let failing = self.failing_ids.lock().unwrap();
        if user_ids.iter().any(|id| failing.contains(id)) {
            return Err(ProviderError::Storage("simulated batch failure".into()));
        }
        let mut rows = self.rows.lock().unwrap();
        let mut updated = 0;
        for id in user_ids {
            if let Some((t, remaining)) = rows.get_mut(id) {
                if *t == tier {
                    *remaining = value;
                    updated += 1;
                }
            }
        }
        Ok(updated)
    }

    async fn set_tier(
        &self,
        user_id: DbId,
        tier: SubscriptionTier,
    ) -> Result<Option<QuotaState>, ProviderError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.get_mut(&user_id).map(|row| {
            row.0 = tier;
            QuotaState {
                user_id,
                subscription_tier: tier,
                generations_remaining: row.1,
            }
        }))
    }
}

// ---------------------------------------------------------------------------
// Generation backend
// ---------------------------------------------------------------------------

/// Replies according to rules matched against the prompt text.
pub struct ScriptedBackend {
    rules: Vec<(String, Result<String, ProviderError>)>,
    fallback: Result<String, ProviderError>,
    calls: AtomicUsize,
    barrier: Option<Arc<Barrier>>,
}

impl ScriptedBackend {
    /// Reply with `reply` to every prompt.
    pub fn always(reply: Result<String, ProviderError>) -> Self {
        Self {
            rules: Vec::new(),
            fallback: reply,
            calls: AtomicUsize::new(0),
            barrier: None,
        }
    }

    /// Reply with `reply` when the prompt contains `needle`.
    pub fn on(mut self, needle: &str, reply: Result<String, ProviderError>) -> Self {
        self.rules.push((needle.to_string(), reply));
        self
    }

    /// Hold every call until `barrier` is released by all parties.
    pub fn with_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        self.rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryCatalog {
    entries: Mutex<HashMap<String, IdeaRecord>>,
    failing_names: Mutex<HashSet<String>>,
    writes: AtomicUsize,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<IdeaRecord> {
        self.entries.lock().unwrap().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_upserts_of(&self, name: &str) {
        self.failing_names.lock().unwrap().insert(name.to_string());
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn upsert(&self, record: &IdeaRecord) -> Result<(), ProviderError> {
        if self.failing_names.lock().unwrap().contains(&record.name) {
            return Err(ProviderError::Storage("simulated write failure".into()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap()
            .insert(record.name.clone(), record.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryIdentity {
    accounts: Mutex<HashMap<String, DbId>>,
    claims: Mutex<HashMap<(DbId, String), bool>>,
    fail_writes: bool,
}

impl InMemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn add_account(&self, email: &str, user_id: DbId) {
        self.accounts
            .lock()
            .unwrap()
            .insert(email.to_string(), user_id);
    }

    pub fn claim(&self, user_id: DbId, key: &str) -> Option<bool> {
        self.claims
            .lock()
            .unwrap()
            .get(&(user_id, key.to_string()))
            .copied()
    }

    pub fn claim_count(&self) -> usize {
        self.claims.lock().unwrap().len()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentity {
    async fn resolve_by_email(&self, email: &str) -> Result<Option<DbId>, ProviderError> {
        Ok(self.accounts.lock().unwrap().get(email).copied())
    }

    async fn set_claim(&self, user_id: DbId, key: &str, value: bool) -> Result<(), ProviderError> {
        if self.fail_writes {
            return Err(ProviderError::Storage("simulated claim write failure".into()));
        }
        self.claims
            .lock()
            .unwrap()
            .insert((user_id, key.to_string()), value);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Feed
// ---------------------------------------------------------------------------

pub struct StaticFeed {
    pub label: String,
    pub posts: Result<Vec<SourcePost>, ProviderError>,
}

impl StaticFeed {
    pub fn new(label: &str, posts: Vec<SourcePost>) -> Self {
        Self {
            label: label.to_string(),
            posts: Ok(posts),
        }
    }
}

#[async_trait]
impl FeedSource for StaticFeed {
    fn origin_label(&self) -> &str {
        &self.label
    }

    async fn fetch_posts(&self, limit: usize) -> Result<Vec<SourcePost>, ProviderError> {
        self.posts
            .clone()
            .map(|posts| posts.into_iter().take(limit).collect())
    }
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

pub struct RecordingPayments {
    reply: Result<String, ProviderError>,
    requests: Mutex<Vec<(String, DbId)>>,
}

impl RecordingPayments {
    pub fn ok(session_id: &str) -> Self {
        Self {
            reply: Ok(session_id.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: ProviderError) -> Self {
        Self {
            reply: Err(err),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(String, DbId)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentProvider for RecordingPayments {
    async fn create_checkout_session(
        &self,
        price_id: &str,
        user_id: DbId,
    ) -> Result<CheckoutSession, ProviderError> {
        self.requests
            .lock()
            .unwrap()
            .push((price_id.to_string(), user_id));
        self.reply.clone().map(|session_id| CheckoutSession { session_id })
    }
}

pub fn post(title: &str, body: &str) -> SourcePost {
    SourcePost {
        title: title.to_string(),
        body: body.to_string(),
    }
}

/// A valid fenced backend reply for an idea called `name`.
pub fn fenced_idea(name: &str) -> String {
    format!(
        "```json\n{{\"name\":\"{name}\",\"description\":\"A test idea\",\"category\":\"Board Game\",\
         \"genre\":\"Strategy\",\"viability\":64,\"viabilityBreakdown\":{{\"originality\":70,\
         \"marketAppeal\":55,\"scope\":80}}}}\n```"
    )
}
