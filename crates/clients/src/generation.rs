//! Client for a Gemini-style `generateContent` text-generation endpoint.

use std::time::Duration;

use async_trait::async_trait;
use ideaforge_core::providers::{GenerationBackend, ProviderError};
use serde::Deserialize;

use crate::error::{ensure_success, ClientError};

/// Generation API settings.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl GenerationConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                   | Default                                      |
    /// |---------------------------|----------------------------------------------|
    /// | `GENERATION_API_URL`      | `https://generativelanguage.googleapis.com`  |
    /// | `GENERATION_API_KEY`      | required                                     |
    /// | `GENERATION_MODEL`        | `gemini-1.5-flash`                           |
    /// | `GENERATION_TIMEOUT_SECS` | `60`                                         |
    pub fn from_env() -> Self {
        let api_url = std::env::var("GENERATION_API_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".into());
        let api_key =
            std::env::var("GENERATION_API_KEY").expect("GENERATION_API_KEY must be set");
        let model = std::env::var("GENERATION_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".into());
        let timeout_secs: u64 = std::env::var("GENERATION_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("GENERATION_TIMEOUT_SECS must be a valid u64");

        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            timeout_secs,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Concatenate the text parts of the first candidate.
fn first_candidate_text(response: &GenerateContentResponse) -> Option<String> {
    let parts = &response.candidates.first()?.content.as_ref()?.parts;
    let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
    (!text.is_empty()).then_some(text)
}

/// HTTP client for the generation endpoint.
pub struct GenerationApi {
    client: reqwest::Client,
    config: GenerationConfig,
}

impl GenerationApi {
    pub fn new(config: GenerationConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_url, self.config.model
        )
    }

    /// Send a single-turn prompt and return the reply text.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, ClientError> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let parsed: GenerateContentResponse = ensure_success(response).await?.json().await?;
        first_candidate_text(&parsed)
            .ok_or_else(|| ClientError::UnexpectedResponse("no candidate text".into()))
    }
}

#[async_trait]
impl GenerationBackend for GenerationApi {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.generate_text(prompt).await.map_err(|e| {
            tracing::warn!(model = %self.config.model, error = %e, "Generation request failed");
            ProviderError::from(e)
        })
    }
}
