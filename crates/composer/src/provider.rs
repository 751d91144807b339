use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::ComposerConfig;
use crate::error::CompletionError;
use crate::gemini::GeminiProvider;
use crate::openai::OpenAiProvider;

/// Trait implemented by concrete LLM providers.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short provider label used in logs.
    fn name(&self) -> &str;

    /// Sends `prompt` and returns the generated text.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// Builds the HTTP provider selected by `cfg.provider`.
pub fn provider_from_config(
    cfg: &ComposerConfig,
) -> Result<Arc<dyn CompletionProvider>, CompletionError> {
    cfg.validate()?;
    let provider: Arc<dyn CompletionProvider> = match cfg.provider.as_str() {
        "openai" => Arc::new(OpenAiProvider::from_config(cfg)?),
        _ => Arc::new(GeminiProvider::from_config(cfg)?),
    };
    Ok(provider)
}

pub(crate) fn http_client(cfg: &ComposerConfig) -> Result<reqwest::Client, CompletionError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(cfg.api_timeout_secs))
        .build()
        .map_err(|e| CompletionError::InvalidConfig(format!("failed to build HTTP client: {e}")))
}

/// Sends `request` and decodes a JSON body, mapping HTTP failures onto
/// [`CompletionError`].
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    provider: &str,
) -> Result<T, CompletionError> {
    let response = request
        .send()
        .await
        .map_err(|e| CompletionError::Unavailable(format!("failed to call {provider}: {e}")))?;

    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let body = response.text().await.unwrap_or_default();
        return Err(CompletionError::RateLimited(format!(
            "{provider} returned {status}: {body}"
        )));
    }
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<body unavailable>".to_string());
        return Err(CompletionError::Unavailable(format!(
            "{provider} returned {status}: {body}"
        )));
    }

    response.json::<T>().await.map_err(|e| {
        CompletionError::MalformedResponse(format!("failed to parse {provider} response: {e}"))
    })
}

pub(crate) fn base_url<'a>(cfg: &'a ComposerConfig, default: &'a str) -> &'a str {
    cfg.api_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(default)
        .trim_end_matches('/')
}
