use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SemanticError;

/// Default dimensionality of the offline hashing embedder. Matches the
/// all-MiniLM-L6-v2 / bge-small output width so configs can switch modes
/// without touching index settings.
pub const DEFAULT_DIMENSION: usize = 384;

/// Token budget per text for `onnx` mode; longer inputs are truncated.
pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 256;

/// Runtime configuration describing which embedder to build and how to
/// post-process its vectors.
///
/// # Example
/// ```
/// use semantic::SemanticConfig;
///
/// let cfg = SemanticConfig {
///     mode: "api".into(),
///     api_url: Some("https://router.huggingface.co/hf-inference/models/sentence-transformers/all-MiniLM-L6-v2/pipeline/feature-extraction".into()),
///     api_auth_header: Some("Bearer hf_xxx".into()),
///     api_provider: Some("hf".into()),
///     ..Default::default()
/// };
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SemanticConfig {
    /// Embedder selector: `"fast"` (offline hashing), `"onnx"` (local
    /// sentence-transformer) or `"api"` (remote HTTP).
    pub mode: String,
    /// Label reported by `onnx` and `api` embedders through
    /// [`Embedder::model_name`](crate::Embedder::model_name). Also sent as
    /// `model` in OpenAI-style payloads. The hashing embedder always reports
    /// `"hashing-bow"`.
    pub model_name: String,
    /// Exported ONNX graph for `onnx` mode.
    pub model_path: Option<PathBuf>,
    /// `tokenizer.json` matching [`model_path`](Self::model_path).
    pub tokenizer_path: Option<PathBuf>,
    /// Maximum tokens per text in `onnx` mode.
    pub max_sequence_length: usize,
    /// Endpoint when [`mode`](Self::mode) is `"api"`.
    pub api_url: Option<String>,
    /// Authorization header value (e.g., `"Bearer hf_xxx"`).
    pub api_auth_header: Option<String>,
    /// Remote provider hint: `"hf"`, `"openai"`, or `"custom"` (default).
    pub api_provider: Option<String>,
    /// Overall API timeout in seconds.
    pub api_timeout_secs: Option<u64>,
    /// Normalize every vector to unit length.
    pub normalize: bool,
    /// Output width of the hashing embedder. Ignored in `onnx` and `api` modes.
    pub dimension: usize,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            mode: "fast".into(),
            model_name: "hashing-bow".into(),
            model_path: None,
            tokenizer_path: None,
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
            api_url: None,
            api_auth_header: None,
            api_provider: None,
            api_timeout_secs: Some(30),
            normalize: true,
            dimension: DEFAULT_DIMENSION,
        }
    }
}

impl SemanticConfig {
    /// Local all-MiniLM-L6-v2 laid out the way the Hugging Face export is:
    /// `<dir>/onnx/model.onnx` next to `<dir>/tokenizer.json`.
    pub fn onnx(model_dir: impl AsRef<Path>) -> Self {
        let dir = model_dir.as_ref();
        Self {
            mode: "onnx".into(),
            model_name: "all-MiniLM-L6-v2".into(),
            model_path: Some(dir.join("onnx").join("model.onnx")),
            tokenizer_path: Some(dir.join("tokenizer.json")),
            ..Default::default()
        }
    }

    /// Checks that the selected mode has everything it needs.
    pub fn validate(&self) -> Result<(), SemanticError> {
        match self.mode.as_str() {
            "fast" => {
                if self.dimension == 0 {
                    return Err(SemanticError::InvalidConfig(
                        "dimension must be greater than zero".into(),
                    ));
                }
            }
            "onnx" => {
                if self.model_path.is_none() || self.tokenizer_path.is_none() {
                    return Err(SemanticError::InvalidConfig(
                        "model_path and tokenizer_path are required for onnx mode".into(),
                    ));
                }
                if self.max_sequence_length == 0 {
                    return Err(SemanticError::InvalidConfig(
                        "max_sequence_length must be greater than zero".into(),
                    ));
                }
            }
            "api" => {
                let url = self.api_url.as_deref().unwrap_or("").trim();
                if url.is_empty() {
                    return Err(SemanticError::InvalidConfig(
                        "api_url is required for api mode".into(),
                    ));
                }
                if self.api_timeout_secs == Some(0) {
                    return Err(SemanticError::InvalidConfig(
                        "api_timeout_secs must be greater than zero".into(),
                    ));
                }
            }
            other => {
                return Err(SemanticError::InvalidConfig(format!(
                    "unknown embedder mode '{other}' (expected 'fast', 'onnx' or 'api')"
                )));
            }
        }
        Ok(())
    }
}
