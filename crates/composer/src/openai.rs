use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::config::ComposerConfig;
use crate::error::CompletionError;
use crate::provider::{base_url, http_client, send_json, CompletionProvider};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// OpenAI-compatible chat completions client.
pub struct OpenAiProvider {
    model: String,
    endpoint: String,
    headers: HeaderMap,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn from_config(cfg: &ComposerConfig) -> Result<Self, CompletionError> {
        let auth = format!("Bearer {}", cfg.require_api_key()?);
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|_| CompletionError::InvalidConfig("invalid OpenAI API key".into()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            model: cfg.model.trim().to_string(),
            endpoint: format!("{}/v1/chat/completions", base_url(cfg, DEFAULT_BASE_URL)),
            headers,
            temperature: cfg.temperature,
            max_tokens: cfg.max_output_tokens,
            client: http_client(cfg)?,
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let body = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        let request = self
            .client
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .json(&body);

        let parsed: ChatResponse = send_json(request, "OpenAI").await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| {
                CompletionError::MalformedResponse("OpenAI response contained no choices".into())
            })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}
