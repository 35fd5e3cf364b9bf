//! Reader for a Reddit-style JSON listing of idea posts.

use async_trait::async_trait;
use ideaforge_core::providers::{FeedSource, ProviderError, SourcePost};
use serde::Deserialize;

use crate::error::{ensure_success, ClientError};

/// Feed settings.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub url: String,
    pub origin_label: String,
    pub max_posts: usize,
}

impl FeedConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var             | Default                                           |
    /// |---------------------|---------------------------------------------------|
    /// | `FEED_URL`          | `https://www.reddit.com/r/gameideas/new.json`     |
    /// | `FEED_ORIGIN_LABEL` | `reddit`                                          |
    /// | `FEED_MAX_POSTS`    | `25`                                              |
    pub fn from_env() -> Self {
        let url = std::env::var("FEED_URL")
            .unwrap_or_else(|_| "https://www.reddit.com/r/gameideas/new.json".into());
        let origin_label = std::env::var("FEED_ORIGIN_LABEL").unwrap_or_else(|_| "reddit".into());
        let max_posts: usize = std::env::var("FEED_MAX_POSTS")
            .unwrap_or_else(|_| "25".into())
            .parse()
            .expect("FEED_MAX_POSTS must be a valid usize");

        Self {
            url,
            origin_label,
            max_posts,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: PostData,
}

#[derive(Debug, Deserialize)]
struct PostData {
    #[serde(default)]
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    stickied: bool,
}

/// Flatten a listing into posts, dropping pinned moderator posts.
fn posts_from_listing(listing: Listing, limit: usize) -> Vec<SourcePost> {
    listing
        .data
        .children
        .into_iter()
        .map(|c| c.data)
        .filter(|p| !p.stickied)
        .take(limit)
        .map(|p| SourcePost {
            title: p.title,
            body: p.selftext,
        })
        .collect()
}

pub struct RedditFeed {
    client: reqwest::Client,
    config: FeedConfig,
}

impl RedditFeed {
    pub fn new(config: FeedConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ideaforge/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn max_posts(&self) -> usize {
        self.config.max_posts
    }

    async fn fetch_listing(&self, limit: usize) -> Result<Listing, ClientError> {
        let response = self
            .client
            .get(&self.config.url)
            .query(&[("limit", limit)])
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }
}

#[async_trait]
impl FeedSource for RedditFeed {
    fn origin_label(&self) -> &str {
        &self.config.origin_label
    }

    async fn fetch_posts(&self, limit: usize) -> Result<Vec<SourcePost>, ProviderError> {
        let limit = limit.min(self.config.max_posts);
        let listing = self.fetch_listing(limit).await.map_err(|e| {
            tracing::warn!(url = %self.config.url, error = %e, "Feed fetch failed");
            ProviderError::from(e)
        })?;
        Ok(posts_from_listing(listing, limit))
    }
}
