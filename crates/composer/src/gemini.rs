use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ComposerConfig;
use crate::error::CompletionError;
use crate::provider::{base_url, http_client, send_json, CompletionProvider};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini `generateContent` client.
pub struct GeminiProvider {
    api_key: String,
    endpoint: String,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn from_config(cfg: &ComposerConfig) -> Result<Self, CompletionError> {
        let api_key = cfg.require_api_key()?.to_string();
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            base_url(cfg, DEFAULT_BASE_URL),
            cfg.model.trim()
        );
        Ok(Self {
            api_key,
            endpoint,
            temperature: cfg.temperature,
            max_output_tokens: cfg.max_output_tokens,
            client: http_client(cfg)?,
        })
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: (self.temperature.is_some() || self.max_output_tokens.is_some())
                .then_some(GenerationConfig {
                    temperature: self.temperature,
                    max_output_tokens: self.max_output_tokens,
                }),
        };
        let request = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&body);

        let parsed: GenerateResponse = send_json(request, "Gemini").await?;
        let candidate = parsed.candidates.into_iter().next().ok_or_else(|| {
            CompletionError::MalformedResponse("Gemini response contained no candidates".into())
        })?;
        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        Ok(text)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}
