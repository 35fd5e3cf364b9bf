//! Periodic classification of feed posts into the public catalog.

use std::sync::Arc;
use std::time::Duration;

use ideaforge_core::classifier::BatchClassifier;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

async fn run_once(classifier: &BatchClassifier) {
    match classifier.run().await {
        Ok(report) => tracing::info!(
            attempted = report.attempted,
            persisted = report.persisted.len(),
            failed = report.failures.len(),
            "Classification job: run complete"
        ),
        Err(e) => tracing::error!(error = %e, "Classification job: run failed"),
    }
}

/// Run the classification loop every `every` until `cancel` is triggered.
pub async fn run(
    classifier: Arc<BatchClassifier>,
    every: Duration,
    run_on_startup: bool,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs = every.as_secs(), "Classification job started");

    if run_on_startup {
        run_once(&classifier).await;
    }

    let mut interval = tokio::time::interval_at(Instant::now() + every, every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Classification job stopping");
                break;
            }
            _ = interval.tick() => run_once(&classifier).await,
        }
    }
}
