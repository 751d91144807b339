use std::sync::Arc;

use crate::config::ComposerConfig;
use crate::error::CompletionError;
use crate::prompt::{answer_prompt, intent_prompt};
use crate::provider::{provider_from_config, CompletionProvider};

/// Turns a question plus retrieved clauses into a final answer.
///
/// Provider failures never surface to the caller: `answer` and `respond`
/// always return text, falling back to
/// [`ComposerConfig::fallback_answer`] when the provider errors or returns
/// nothing.
#[derive(Clone)]
pub struct AnswerComposer {
    provider: Arc<dyn CompletionProvider>,
    config: ComposerConfig,
}

impl AnswerComposer {
    pub fn new(provider: Arc<dyn CompletionProvider>, config: ComposerConfig) -> Self {
        Self { provider, config }
    }

    /// Builds the configured HTTP provider and wraps it.
    pub fn from_config(config: &ComposerConfig) -> Result<Self, CompletionError> {
        Ok(Self::new(provider_from_config(config)?, config.clone()))
    }

    /// Builds the answering prompt. Pure; no provider call.
    pub fn compose<T: AsRef<str>>(&self, query: &str, retrieved: &[T], intent: Option<&str>) -> String {
        answer_prompt(query, intent, retrieved)
    }

    /// Sends `prompt` to the provider, degrading to the fallback answer on failure.
    pub async fn answer(&self, prompt: &str) -> String {
        match self.provider.complete(prompt).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    "provider returned an empty completion; using fallback answer"
                );
                self.config.fallback_answer.clone()
            }
            Err(err) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    error = %err,
                    "completion failed; using fallback answer"
                );
                self.config.fallback_answer.clone()
            }
        }
    }

    /// Asks the provider to restate `query` as structured JSON.
    ///
    /// The result is opaque text that is only ever pasted into the answering
    /// prompt. Failures yield `None`.
    pub async fn parse_intent(&self, query: &str) -> Option<String> {
        match self.provider.complete(&intent_prompt(query)).await {
            Ok(text) => {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            Err(err) => {
                tracing::debug!(
                    provider = self.provider.name(),
                    error = %err,
                    "intent parse failed; answering without it"
                );
                None
            }
        }
    }

    /// Intent parse (when enabled), compose, answer.
    pub async fn respond<T: AsRef<str> + Sync>(&self, query: &str, retrieved: &[T]) -> String {
        let intent = if self.config.parse_intent {
            self.parse_intent(query).await
        } else {
            None
        };
        let prompt = self.compose(query, retrieved, intent.as_deref());
        tracing::debug!(
            clauses = retrieved.len(),
            intent = intent.is_some(),
            prompt_chars = prompt.len(),
            "composed answer prompt"
        );
        self.answer(&prompt).await
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}

impl std::fmt::Debug for AnswerComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerComposer")
            .field("provider", &self.provider.name())
            .field("parse_intent", &self.config.parse_intent)
            .finish()
    }
}
