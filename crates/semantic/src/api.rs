use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::SemanticConfig;
use crate::embedder::{check_batch_shape, Embedder, Embedding};
use crate::error::SemanticError;
use crate::normalize::l2_normalize_in_place;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApiProviderKind {
    HuggingFace,
    OpenAI,
    Custom,
}

impl ApiProviderKind {
    fn from_hint(hint: Option<&str>) -> Self {
        match hint.unwrap_or("custom").to_ascii_lowercase().as_str() {
            "hf" | "huggingface" => ApiProviderKind::HuggingFace,
            "openai" | "gpt" => ApiProviderKind::OpenAI,
            _ => ApiProviderKind::Custom,
        }
    }
}

/// Embedder backed by a remote HTTP inference endpoint.
///
/// One `embed` call is one POST carrying the whole batch. The client is built
/// once and reused for connection pooling.
#[derive(Debug, Clone)]
pub struct ApiEmbedder {
    client: reqwest::Client,
    url: String,
    auth_header: Option<String>,
    provider: ApiProviderKind,
    model_name: String,
    normalize: bool,
}

impl ApiEmbedder {
    pub fn from_config(cfg: &SemanticConfig) -> Result<Self, SemanticError> {
        let url = cfg
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| SemanticError::InvalidConfig("api_url is required for api mode".into()))?;

        let timeout = Duration::from_secs(cfg.api_timeout_secs.unwrap_or(30));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()
            .map_err(|e| SemanticError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.to_string(),
            auth_header: cfg.api_auth_header.clone(),
            provider: ApiProviderKind::from_hint(cfg.api_provider.as_deref()),
            model_name: cfg.model_name.clone(),
            normalize: cfg.normalize,
        })
    }

    async fn send(&self, payload: Value) -> Result<Value, SemanticError> {
        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json");
        if let Some(header) = self.auth_header.as_deref() {
            request = request.header("Authorization", header);
        }

        let response = request
            .json(&payload)
            .send()
            .await
            .map_err(|e| SemanticError::Unavailable(format!("HTTP request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SemanticError::Unavailable(format!(
                "HTTP error {status}: {body}"
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SemanticError::MalformedResponse(format!("invalid JSON response: {e}")))
    }
}

#[async_trait]
impl Embedder for ApiEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> Option<usize> {
        None
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, SemanticError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let payload = build_api_payload(self.provider, texts, &self.model_name);
        let response = self.send(payload).await?;
        let mut vectors = parse_embeddings_from_value(response)?;
        check_batch_shape(&vectors, texts.len())?;

        if self.normalize {
            vectors.iter_mut().for_each(|v| l2_normalize_in_place(v));
        }

        tracing::debug!(
            batch = texts.len(),
            dimension = vectors.first().map(Vec::len).unwrap_or(0),
            model = %self.model_name,
            "remote embedding batch complete"
        );
        Ok(vectors)
    }
}

fn build_api_payload(provider: ApiProviderKind, texts: &[String], model_name: &str) -> Value {
    match provider {
        ApiProviderKind::HuggingFace => json!({ "inputs": texts }),
        ApiProviderKind::OpenAI => json!({ "input": texts, "model": model_name }),
        ApiProviderKind::Custom => json!({ "texts": texts }),
    }
}

fn parse_embeddings_from_value(value: Value) -> Result<Vec<Embedding>, SemanticError> {
    match value {
        Value::Object(mut map) => {
            if let Some(embeddings) = map.remove("embeddings") {
                return parse_embedding_collection(embeddings);
            }

            if let Some(Value::Array(items)) = map.remove("data") {
                return items
                    .into_iter()
                    .map(|item| match item {
                        Value::Object(mut obj) => obj
                            .remove("embedding")
                            .ok_or_else(|| {
                                SemanticError::MalformedResponse(
                                    "missing `embedding` field in data item".into(),
                                )
                            })
                            .and_then(parse_embedding_vector),
                        _ => Err(SemanticError::MalformedResponse(
                            "unexpected entry inside `data` array".into(),
                        )),
                    })
                    .collect();
            }

            Err(SemanticError::MalformedResponse(
                "unsupported API response shape".into(),
            ))
        }
        other => parse_embedding_collection(other),
    }
}

fn parse_embedding_collection(value: Value) -> Result<Vec<Embedding>, SemanticError> {
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                Ok(Vec::new())
            } else if items.iter().all(|item| matches!(item, Value::Array(_))) {
                items.into_iter().map(parse_embedding_vector).collect()
            } else {
                parse_embedding_vector(Value::Array(items)).map(|vec| vec![vec])
            }
        }
        other => parse_embedding_vector(other).map(|vec| vec![vec]),
    }
}

fn parse_embedding_vector(value: Value) -> Result<Embedding, SemanticError> {
    match value {
        Value::Array(values) => values
            .into_iter()
            .map(|entry| match entry {
                Value::Number(num) => num.as_f64().map(|f| f as f32).ok_or_else(|| {
                    SemanticError::MalformedResponse("non-finite embedding value".into())
                }),
                other => Err(SemanticError::MalformedResponse(format!(
                    "embedding entries must be numbers, got {other}"
                ))),
            })
            .collect(),
        other => Err(SemanticError::MalformedResponse(format!(
            "embedding vector must be an array, got {other}"
        ))),
    }
}
