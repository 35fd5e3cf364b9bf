//! Batch classification of externally sourced idea posts into the public catalog.
//!
//! Each post is classified independently: a backend error, a rejected response
//! or a failed write is recorded against that post and the batch moves on.
//! Catalog writes are upserts keyed by idea name, so overlapping runs are safe.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::error::CoreError;
use crate::normalizer::normalize;
use crate::prompts::classification_prompt;
use crate::providers::{CatalogStore, FeedSource, GenerationBackend, SourcePost};

/// Default number of posts attempted per run.
pub const DEFAULT_MAX_POSTS: usize = 25;

/// Default number of posts classified concurrently.
pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub max_posts: usize,
    pub concurrency: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_posts: DEFAULT_MAX_POSTS,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Pipeline step at which a post was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    Backend,
    Normalize,
    Persist,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostFailure {
    pub post_title: String,
    pub stage: FailureStage,
    pub reason: String,
}

/// Per-run outcome, one entry per attempted post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationReport {
    pub attempted: usize,
    /// Catalog names written, in post order.
    pub persisted: Vec<String>,
    pub failures: Vec<PostFailure>,
}

pub struct BatchClassifier {
    backend: Arc<dyn GenerationBackend>,
    catalog: Arc<dyn CatalogStore>,
    feed: Arc<dyn FeedSource>,
    config: ClassifierConfig,
}

impl BatchClassifier {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        catalog: Arc<dyn CatalogStore>,
        feed: Arc<dyn FeedSource>,
        config: ClassifierConfig,
    ) -> Self {
        Self {
            backend,
            catalog,
            feed,
            config,
        }
    }

    /// Fetch the latest posts and classify them.
    ///
    /// Only a feed fetch failure is returned as an error; per-post failures
    /// are reported in the [`ClassificationReport`].
    pub async fn run(&self) -> Result<ClassificationReport, CoreError> {
        let posts = self
            .feed
            .fetch_posts(self.config.max_posts)
            .await
            .map_err(|e| CoreError::Internal(format!("Feed fetch failed: {e}")))?;

        tracing::info!(
            origin = self.feed.origin_label(),
            posts = posts.len(),
            "Classification run started"
        );

        let report = self.classify_posts(posts).await;

        tracing::info!(
            origin = self.feed.origin_label(),
            attempted = report.attempted,
            persisted = report.persisted.len(),
            failed = report.failures.len(),
            "Classification run finished"
        );
        Ok(report)
    }

    /// Classify `posts` (capped at `max_posts`) and fold the outcomes.
    pub async fn classify_posts(&self, posts: Vec<SourcePost>) -> ClassificationReport {
        let origin = self.feed.origin_label();

        stream::iter(posts.into_iter().take(self.config.max_posts))
            .map(|post| async move {
                let outcome = self.classify_one(&post, origin).await;
                (post, outcome)
            })
            .buffered(self.config.concurrency.max(1))
            .fold(ClassificationReport::default(), |mut report, (post, outcome)| async move {
                report.attempted += 1;
                match outcome {
                    Ok(name) => report.persisted.push(name),
                    Err((stage, reason)) => {
                        tracing::warn!(
                            post_title = %post.title,
                            stage = ?stage,
                            reason = %reason,
                            "Skipping post"
                        );
                        report.failures.push(PostFailure {
                            post_title: post.title,
                            stage,
                            reason,
                        });
                    }
                }
                report
            })
            .await
    }

    async fn classify_one(
        &self,
        post: &SourcePost,
        origin: &str,
    ) -> Result<String, (FailureStage, String)> {
        if post.title.trim().is_empty() && post.body.trim().is_empty() {
            return Err((FailureStage::Normalize, "post has no content".into()));
        }

        let raw = self
            .backend
            .generate(&classification_prompt(post))
            .await
            .map_err(|e| (FailureStage::Backend, e.to_string()))?;

        let record = normalize(&raw, origin).map_err(|e| (FailureStage::Normalize, e.to_string()))?;

        self.catalog
            .upsert(&record)
            .await
            .map_err(|e| (FailureStage::Persist, e.to_string()))?;

        tracing::debug!(idea = %record.name, post_title = %post.title, "Catalog entry upserted");
        Ok(record.name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
