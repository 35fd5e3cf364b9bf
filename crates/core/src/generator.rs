//! User-triggered idea generation.
//!
//! Order of checks: authentication, prompt validation, quota reservation,
//! backend dispatch, normalization, quota commit. Nothing is written before
//! the final step, so every failure leaves the user's allowance untouched.

use std::sync::Arc;

use crate::error::CoreError;
use crate::idea::{IdeaRecord, SOURCE_USER};
use crate::normalizer::normalize;
use crate::policy::{authorize, Caller, Capability};
use crate::prompts::generation_prompt;
use crate::providers::GenerationBackend;
use crate::quota::{DenyReason, QuotaDecision, QuotaLedger};

/// Default upper bound on the user prompt length, in characters.
pub const DEFAULT_MAX_PROMPT_CHARS: usize = 2000;

/// Generator settings.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub max_prompt_chars: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_prompt_chars: DEFAULT_MAX_PROMPT_CHARS,
        }
    }
}

impl GeneratorConfig {
    /// Reads `MAX_PROMPT_CHARS` (default `2000`).
    pub fn from_env() -> Self {
        let max_prompt_chars = std::env::var("MAX_PROMPT_CHARS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_MAX_PROMPT_CHARS);
        Self { max_prompt_chars }
    }
}

/// Orchestrates a single generation request.
pub struct IdeaGenerator {
    backend: Arc<dyn GenerationBackend>,
    ledger: QuotaLedger,
    config: GeneratorConfig,
}

impl IdeaGenerator {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        ledger: QuotaLedger,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            backend,
            ledger,
            config,
        }
    }

    pub fn ledger(&self) -> &QuotaLedger {
        &self.ledger
    }

    /// Generate one idea for `caller` from `prompt`.
    pub async fn generate(
        &self,
        caller: Option<&Caller>,
        prompt: &str,
    ) -> Result<IdeaRecord, CoreError> {
        let caller = authorize(caller, Capability::GenerateIdea)?;
        let prompt = self.validate_prompt(prompt)?;

        let reservation = match self.ledger.check_and_reserve(caller.user_id).await? {
            QuotaDecision::Allowed(reservation) => reservation,
            QuotaDecision::Denied(DenyReason::QuotaExhausted) => {
                tracing::info!(user_id = caller.user_id, "Generation denied: quota exhausted");
                return Err(CoreError::QuotaExhausted);
            }
            QuotaDecision::Denied(DenyReason::UnknownUser) => {
                return Err(CoreError::NotFound {
                    entity: "User",
                    id: caller.user_id,
                });
            }
        };

        let raw = self
            .backend
            .generate(&generation_prompt(prompt))
            .await
            .map_err(|e| {
                tracing::warn!(user_id = caller.user_id, error = %e, "Generation backend failed");
                CoreError::GenerationUnavailable(e.to_string())
            })?;

        let record = normalize(&raw, SOURCE_USER).map_err(|e| {
            tracing::warn!(user_id = caller.user_id, error = %e, "Rejected backend response");
            tracing::debug!(user_id = caller.user_id, raw = %raw, "Rejected response text");
            CoreError::from(e)
        })?;

        self.ledger.commit(reservation).await.inspect_err(|e| {
            tracing::info!(user_id = caller.user_id, error = %e, "Generation discarded at commit");
        })?;

        tracing::info!(
            user_id = caller.user_id,
            tier = %reservation.tier,
            idea = %record.name,
            "Idea generated"
        );
        Ok(record)
    }

    fn validate_prompt<'a>(&self, prompt: &'a str) -> Result<&'a str, CoreError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(CoreError::Validation(
                "The function must be called with a non-empty 'prompt' argument.".into(),
            ));
        }
        let len = prompt.chars().count();
        if len > self.config.max_prompt_chars {
            return Err(CoreError::Validation(format!(
                "Prompt is too long ({len} characters, maximum {})",
                self.config.max_prompt_chars
            )));
        }
        Ok(prompt)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
