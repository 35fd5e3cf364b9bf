use std::time::Duration;

use ideaforge_core::classifier::DEFAULT_CONCURRENCY;

use crate::jobs::quota_reset::ResetRetry;

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Time between classification runs.
    pub classification_interval: Duration,
    /// Posts classified concurrently within one run.
    pub classification_concurrency: usize,
    /// Run every job once immediately at startup, before its first
    /// scheduled time.
    pub run_jobs_on_startup: bool,
    /// Retry schedule for an incomplete monthly reset.
    pub reset_retry: ResetRetry,
}

impl WorkerConfig {
    /// | Env Var                        | Default |
    /// |--------------------------------|---------|
    /// | `CLASSIFICATION_INTERVAL_SECS` | `86400` |
    /// | `CLASSIFICATION_CONCURRENCY`   | `4`     |
    /// | `RUN_JOBS_ON_STARTUP`          | `false` |
    /// | `QUOTA_RESET_MAX_ATTEMPTS`     | `6`     |
    /// | `QUOTA_RESET_RETRY_SECS`       | `60`    |
    /// | `QUOTA_RESET_RETRY_MAX_SECS`   | `900`   |
    pub fn from_env() -> Self {
        let interval_secs: u64 = std::env::var("CLASSIFICATION_INTERVAL_SECS")
            .unwrap_or_else(|_| "86400".into())
            .parse()
            .expect("CLASSIFICATION_INTERVAL_SECS must be a valid u64");
        assert!(interval_secs > 0, "CLASSIFICATION_INTERVAL_SECS must be positive");

        let classification_concurrency: usize = std::env::var("CLASSIFICATION_CONCURRENCY")
            .unwrap_or_else(|_| DEFAULT_CONCURRENCY.to_string())
            .parse()
            .expect("CLASSIFICATION_CONCURRENCY must be a valid usize");

        let run_jobs_on_startup = std::env::var("RUN_JOBS_ON_STARTUP")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let defaults = ResetRetry::default();
        let reset_retry = ResetRetry {
            max_attempts: env_parse("QUOTA_RESET_MAX_ATTEMPTS").unwrap_or(defaults.max_attempts),
            initial_delay: env_parse("QUOTA_RESET_RETRY_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.initial_delay),
            max_delay: env_parse("QUOTA_RESET_RETRY_MAX_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.max_delay),
        };

        Self {
            classification_interval: Duration::from_secs(interval_secs),
            classification_concurrency: classification_concurrency.max(1),
            run_jobs_on_startup,
            reset_retry,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().map(|raw| {
        raw.trim()
            .parse()
            .unwrap_or_else(|_| panic!("{key} has an invalid value: {raw:?}"))
    })
}
