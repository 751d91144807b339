use serde::{Deserialize, Serialize};

use crate::error::CompletionError;
use crate::prompt::DEFAULT_FALLBACK_ANSWER;

/// Settings for the completion provider and the answer composer.
///
/// ```
/// use composer::ComposerConfig;
///
/// let cfg = ComposerConfig::default();
/// assert_eq!(cfg.provider, "gemini");
/// assert_eq!(cfg.model, "gemini-1.5-flash");
/// assert!(cfg.parse_intent);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ComposerConfig {
    /// `"gemini"` or `"openai"`.
    pub provider: String,
    pub model: String,
    /// Provider API key. Required to build an HTTP provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL override, e.g. a proxy or an OpenAI-compatible server.
    /// The provider appends its own endpoint path.
    pub api_url: Option<String>,
    pub api_timeout_secs: u64,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    /// Ask the model to restate the question before answering it.
    pub parse_intent: bool,
    /// Returned verbatim whenever the provider fails.
    pub fallback_answer: String,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".into(),
            model: "gemini-1.5-flash".into(),
            api_key: None,
            api_url: None,
            api_timeout_secs: 60,
            temperature: None,
            max_output_tokens: None,
            parse_intent: true,
            fallback_answer: DEFAULT_FALLBACK_ANSWER.into(),
        }
    }
}

impl ComposerConfig {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_parse_intent(mut self, parse_intent: bool) -> Self {
        self.parse_intent = parse_intent;
        self
    }

    pub fn validate(&self) -> Result<(), CompletionError> {
        match self.provider.as_str() {
            "gemini" | "openai" => {}
            other => {
                return Err(CompletionError::InvalidConfig(format!(
                    "unknown provider '{other}' (expected 'gemini' or 'openai')"
                )))
            }
        }
        if self.model.trim().is_empty() {
            return Err(CompletionError::InvalidConfig("model must not be empty".into()));
        }
        if self.api_timeout_secs == 0 {
            return Err(CompletionError::InvalidConfig(
                "api_timeout_secs must be greater than zero".into(),
            ));
        }
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(CompletionError::InvalidConfig(
                    "temperature must be between 0.0 and 2.0".into(),
                ));
            }
        }
        if self.fallback_answer.trim().is_empty() {
            return Err(CompletionError::InvalidConfig(
                "fallback_answer must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// The configured key, or `InvalidConfig` when missing or blank.
    pub(crate) fn require_api_key(&self) -> Result<&str, CompletionError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                CompletionError::InvalidConfig(format!(
                    "api_key is required for provider '{}'",
                    self.provider
                ))
            })
    }
}
