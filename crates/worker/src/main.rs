use std::sync::Arc;
use std::time::Duration;

use ideaforge_clients::feed::{FeedConfig, RedditFeed};
use ideaforge_clients::generation::{GenerationApi, GenerationConfig};
use ideaforge_core::classifier::{BatchClassifier, ClassifierConfig};
use ideaforge_core::quota::{QuotaLedger, QuotaPolicy};
use ideaforge_db::stores::{PgCatalogStore, PgQuotaStore};
use ideaforge_worker::config::WorkerConfig;
use ideaforge_worker::jobs;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How long each job gets to finish its current run after a shutdown signal.
const JOB_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ideaforge_worker=debug,ideaforge_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env();
    let quota_policy = QuotaPolicy::from_env();
    let feed_config = FeedConfig::from_env();
    tracing::info!(
        interval_secs = config.classification_interval.as_secs(),
        concurrency = config.classification_concurrency,
        feed = %feed_config.url,
        "Worker starting"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = ideaforge_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    ideaforge_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // --- Services ---
    let generation = GenerationApi::new(GenerationConfig::from_env())
        .expect("Failed to build generation client");
    let feed = RedditFeed::new(feed_config).expect("Failed to build feed client");
    let max_posts = feed.max_posts();
    let classifier = BatchClassifier::new(
        Arc::new(generation),
        Arc::new(PgCatalogStore::new(pool.clone())),
        Arc::new(feed),
        ClassifierConfig {
            max_posts,
            concurrency: config.classification_concurrency,
        },
    );
    let ledger = QuotaLedger::new(Arc::new(PgQuotaStore::new(pool.clone())), quota_policy);

    // --- Jobs ---
    let cancel = CancellationToken::new();
    let classification_handle = tokio::spawn(jobs::classification::run(
        Arc::new(classifier),
        config.classification_interval,
        config.run_jobs_on_startup,
        cancel.clone(),
    ));
    let reset_handle = tokio::spawn(jobs::quota_reset::run(
        ledger,
        config.reset_retry,
        config.run_jobs_on_startup,
        cancel.clone(),
    ));

    shutdown_signal().await;
    cancel.cancel();

    for (name, handle) in [
        ("classification", classification_handle),
        ("quota_reset", reset_handle),
    ] {
        if tokio::time::timeout(JOB_SHUTDOWN_TIMEOUT, handle).await.is_err() {
            tracing::warn!(job = name, "Job did not stop within the shutdown timeout");
        }
    }

    pool.close().await;
    tracing::info!("Worker stopped");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT (Ctrl-C), shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
