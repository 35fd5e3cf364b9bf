//! Quota ledger: per-user generation allowance and subscription tier.
//!
//! A generation is reserved with [`QuotaLedger::check_and_reserve`] before the
//! backend is called and only charged by [`QuotaLedger::commit`] once the
//! result has been normalized. The charge is an atomic conditional decrement in
//! the store, so two concurrent requests racing for the last unit cannot both
//! succeed; the loser gets [`CoreError::QuotaExhausted`] at commit time.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::providers::QuotaStore;
use crate::types::DbId;

/// Allowance restored to every free-tier user at each monthly reset.
pub const DEFAULT_FREE_BASELINE: i32 = 1;

/// Number of users updated per statement during a reset.
pub const DEFAULT_RESET_BATCH_SIZE: usize = 500;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Subscription tier. Only `Free` is metered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Free,
    Paid,
}

impl SubscriptionTier {
    pub fn as_str(self) -> &'static str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Paid => "paid",
        }
    }
}

impl FromStr for SubscriptionTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(SubscriptionTier::Free),
            "paid" => Ok(SubscriptionTier::Paid),
            other => Err(CoreError::Validation(format!(
                "Invalid subscription tier '{other}'. Must be one of: free, paid"
            ))),
        }
    }
}

impl std::fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current quota state of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaState {
    pub user_id: DbId,
    pub subscription_tier: SubscriptionTier,
    pub generations_remaining: i32,
}

/// Why a reservation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    QuotaExhausted,
    UnknownUser,
}

/// A granted reservation, to be passed back to [`QuotaLedger::commit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    pub user_id: DbId,
    pub tier: SubscriptionTier,
}

/// Outcome of [`QuotaLedger::check_and_reserve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    Allowed(Reservation),
    Denied(DenyReason),
}

/// Tunable quota policy.
#[derive(Debug, Clone)]
pub struct QuotaPolicy {
    /// Value `generations_remaining` is reset to for free-tier users.
    pub free_baseline: i32,
    /// Users per bulk update statement during a reset.
    pub reset_batch_size: usize,
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self {
            free_baseline: DEFAULT_FREE_BASELINE,
            reset_batch_size: DEFAULT_RESET_BATCH_SIZE,
        }
    }
}

impl QuotaPolicy {
    /// Load the policy from environment variables with defaults.
    ///
    /// | Env Var                  | Default |
    /// |--------------------------|---------|
    /// | `FREE_TIER_BASELINE`     | `1`     |
    /// | `QUOTA_RESET_BATCH_SIZE` | `500`   |
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let free_baseline = std::env::var("FREE_TIER_BASELINE")
            .ok()
            .and_then(|v| v.parse::<i32>().ok())
            .filter(|v| *v >= 0)
            .unwrap_or(DEFAULT_FREE_BASELINE);

        let reset_batch_size = std::env::var("QUOTA_RESET_BATCH_SIZE")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_RESET_BATCH_SIZE);

        Self {
            free_baseline,
            reset_batch_size,
        }
    }
}

/// Summary of one [`QuotaLedger::reset_all`] run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetReport {
    pub tier: SubscriptionTier,
    pub users_matched: usize,
    pub users_reset: u64,
    pub failed_batches: usize,
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Enforces the quota rules on top of a [`QuotaStore`].
#[derive(Clone)]
pub struct QuotaLedger {
    store: Arc<dyn QuotaStore>,
    policy: QuotaPolicy,
}

impl QuotaLedger {
    pub fn new(store: Arc<dyn QuotaStore>, policy: QuotaPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &QuotaPolicy {
        &self.policy
    }

    /// Decide whether `user_id` may start a generation. Does not write.
    pub async fn check_and_reserve(&self, user_id: DbId) -> Result<QuotaDecision, CoreError> {
        let Some(state) = self.store.get(user_id).await? else {
            return Ok(QuotaDecision::Denied(DenyReason::UnknownUser));
        };

        let decision = match state.subscription_tier {
            SubscriptionTier::Paid => QuotaDecision::Allowed(Reservation {
                user_id,
                tier: SubscriptionTier::Paid,
            }),
            SubscriptionTier::Free if state.generations_remaining > 0 => {
                QuotaDecision::Allowed(Reservation {
                    user_id,
                    tier: SubscriptionTier::Free,
                })
            }
            SubscriptionTier::Free => QuotaDecision::Denied(DenyReason::QuotaExhausted),
        };
        Ok(decision)
    }

    /// Charge a reservation after a successful generation.
    ///
    /// Paid reservations are free. A free reservation whose conditional
    /// decrement finds nothing left fails with [`CoreError::QuotaExhausted`],
    /// unless the user was upgraded to paid in the meantime.
    pub async fn commit(&self, reservation: Reservation) -> Result<(), CoreError> {
        if reservation.tier == SubscriptionTier::Paid {
            return Ok(());
        }

        if self.store.try_decrement(reservation.user_id).await? {
            return Ok(());
        }

        match self.store.get(reservation.user_id).await? {
            Some(state) if state.subscription_tier == SubscriptionTier::Paid => Ok(()),
            _ => Err(CoreError::QuotaExhausted),
        }
    }

    /// Current quota state for a user.
    pub async fn status(&self, user_id: DbId) -> Result<QuotaState, CoreError> {
        self.store
            .get(user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: user_id,
            })
    }

    /// Move a user to another tier, returning the new state.
    pub async fn set_tier(
        &self,
        user_id: DbId,
        tier: SubscriptionTier,
    ) -> Result<QuotaState, CoreError> {
        self.store
            .set_tier(user_id, tier)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: user_id,
            })
    }

    /// Reset every user of `tier` to the policy baseline.
    ///
    /// Users are updated in sub-batches of `reset_batch_size`; a failing
    /// sub-batch is logged and counted, and the remaining ones still run.
    /// Re-running is idempotent. Only the initial user listing is fatal.
    pub async fn reset_all(&self, tier: SubscriptionTier) -> Result<ResetReport, CoreError> {
        let user_ids = self.store.list_user_ids_by_tier(tier).await?;
        let baseline = self.policy.free_baseline;

        let mut report = ResetReport {
            tier,
            users_matched: user_ids.len(),
            users_reset: 0,
            failed_batches: 0,
        };

        for (index, batch) in user_ids
            .chunks(self.policy.reset_batch_size.max(1))
            .enumerate()
        {
            match self.store.reset_batch(batch, tier, baseline).await {
                Ok(updated) => report.users_reset += updated,
                Err(e) => {
                    tracing::error!(
                        batch = index,
                        batch_len = batch.len(),
                        error = %e,
                        "Quota reset: sub-batch failed"
                    );
                    report.failed_batches += 1;
                }
            }
        }

        tracing::info!(
            tier = %tier,
            matched = report.users_matched,
            reset = report.users_reset,
            failed_batches = report.failed_batches,
            "Quota reset complete"
        );
        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
