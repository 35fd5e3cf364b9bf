//! Monthly reset of free-tier generation allowances, at 00:00 UTC on the
//! first of each month.
//!
//! A reset that fails, or leaves sub-batches unapplied, is re-run with
//! exponential backoff. `reset_all` is idempotent, so users already reset
//! are simply written again.

use std::time::Duration;

use chrono::Utc;
use ideaforge_core::quota::{QuotaLedger, SubscriptionTier};
use tokio_util::sync::CancellationToken;

use crate::schedule::until_next_month;

/// Retry schedule for an incomplete reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetRetry {
    /// Runs per scheduled reset, including the first.
    pub max_attempts: u32,
    /// Wait before the first retry. Doubles per retry up to `max_delay`.
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for ResetRetry {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            initial_delay: Duration::from_secs(60),
            max_delay: Duration::from_secs(15 * 60),
        }
    }
}

impl ResetRetry {
    /// Wait after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }
}

/// One reset pass. Returns `true` when every free-tier user was reset.
async fn run_once(ledger: &QuotaLedger, attempt: u32) -> bool {
    match ledger.reset_all(SubscriptionTier::Free).await {
        Ok(report) if report.failed_batches > 0 => {
            tracing::warn!(
                attempt,
                reset = report.users_reset,
                failed_batches = report.failed_batches,
                "Quota reset job: finished with failed sub-batches"
            );
            false
        }
        Ok(report) => {
            tracing::info!(attempt, reset = report.users_reset, "Quota reset job: run complete");
            true
        }
        Err(e) => {
            tracing::error!(attempt, error = %e, "Quota reset job: could not list users");
            false
        }
    }
}

/// Reset free-tier allowances, retrying per `retry` until a pass completes.
///
/// Returns `false` if attempts run out or `cancel` fires while waiting.
pub async fn reset_with_retry(
    ledger: &QuotaLedger,
    retry: &ResetRetry,
    cancel: &CancellationToken,
) -> bool {
    let max_attempts = retry.max_attempts.max(1);
    for attempt in 1..=max_attempts {
        if run_once(ledger, attempt).await {
            return true;
        }
        if attempt == max_attempts {
            break;
        }

        let delay = retry.delay_after(attempt);
        tracing::info!(attempt, retry_in_secs = delay.as_secs(), "Quota reset job: retrying");
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return false,
            _ = tokio::time::sleep(delay) => {}
        }
    }

    tracing::error!(
        attempts = max_attempts,
        "Quota reset job: giving up until the next scheduled reset"
    );
    false
}

/// Run the reset loop until `cancel` is triggered.
pub async fn run(
    ledger: QuotaLedger,
    retry: ResetRetry,
    run_on_startup: bool,
    cancel: CancellationToken,
) {
    tracing::info!(
        baseline = ledger.policy().free_baseline,
        max_attempts = retry.max_attempts,
        "Quota reset job started"
    );

    if run_on_startup {
        reset_with_retry(&ledger, &retry, &cancel).await;
    }

    loop {
        let wait = until_next_month(Utc::now());
        tracing::debug!(wait_secs = wait.as_secs(), "Quota reset job: sleeping until next month");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Quota reset job stopping");
                break;
            }
            _ = tokio::time::sleep(wait) => {
                reset_with_retry(&ledger, &retry, &cancel).await;
            }
        }
    }
}
