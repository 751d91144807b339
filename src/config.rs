//! YAML configuration file support for policyqa.
//!
//! Every stage (chunking, retrieval, index, embedding, answer composition)
//! can be configured from a single YAML file. Sections that are omitted keep
//! their defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "health policy"
//!
//! chunking:
//!   group_size: 3
//!   collapse_whitespace: true
//!
//! retrieval:
//!   top_k: 5
//!
//! index:
//!   ann:
//!     enabled: false
//!
//! semantic:
//!   mode: "fast"          # or "onnx" with model_path + tokenizer_path
//!   dimension: 384
//!
//! composer:
//!   provider: "gemini"
//!   model: "gemini-1.5-flash"
//!   parse_intent: true
//!
//! log_level: "info"
//! ```
//!
//! Secrets stay out of the file: [`PolicyQaConfig::apply_env_overrides`]
//! fills API keys and endpoints from a lookup the caller supplies.

use std::fs;
use std::path::Path;

use chunker::ChunkerConfig;
use composer::ComposerConfig;
use index::IndexConfig;
use retriever::RetrievalConfig;
use semantic::SemanticConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// LLM API key. Takes precedence over [`GEMINI_API_KEY`].
pub const ENV_LLM_API_KEY: &str = "POLICYQA_LLM_API_KEY";
/// Gemini API key, honoured when `composer.provider` is `"gemini"`.
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
/// Remote embedding endpoint; switches the embedder to `"api"` mode.
pub const ENV_EMBEDDING_API_URL: &str = "POLICYQA_EMBEDDING_API_URL";
/// Bearer token for the remote embedding endpoint.
pub const ENV_EMBEDDING_API_TOKEN: &str = "POLICYQA_EMBEDDING_API_TOKEN";

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration for the question-answering pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct PolicyQaConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    /// Sentence grouping
    #[serde(default)]
    pub chunking: ChunkerConfig,

    /// Query-time settings
    #[serde(default)]
    pub retrieval: RetrievalYamlConfig,

    /// Vector index settings
    #[serde(default)]
    pub index: IndexConfig,

    /// Embedding model settings
    #[serde(default)]
    pub semantic: SemanticConfig,

    /// LLM provider and prompt settings
    #[serde(default)]
    pub composer: ComposerConfig,

    /// Default `tracing` filter for the binary; `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl PolicyQaConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: PolicyQaConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the version and every section.
    ///
    /// Provider credentials are not required here; they are checked when the
    /// provider is built, after environment overrides have been applied.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.retrieval_config()
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("retrieval: {e}")))?;
        self.semantic
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("semantic: {e}")))?;
        self.composer
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("composer: {e}")))?;
        if self.log_level.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "log_level must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Fills credentials and endpoints from `lookup`.
    ///
    /// The binary passes `std::env::var`; tests pass a closure over a map.
    /// Values that are unset or blank leave the file's settings untouched.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_LLM_API_KEY) {
            self.composer.api_key = Some(key);
        } else if self.composer.provider == "gemini"
            && self.composer.api_key.is_none()
            && let Some(key) = get(GEMINI_API_KEY)
        {
            self.composer.api_key = Some(key);
        }

        if let Some(url) = get(ENV_EMBEDDING_API_URL) {
            self.semantic.mode = "api".into();
            self.semantic.api_url = Some(url);
        }
        if let Some(token) = get(ENV_EMBEDDING_API_TOKEN) {
            self.semantic.api_auth_header = Some(format!("Bearer {token}"));
        }
    }

    /// The retriever's view of this file: chunking, top-k and index settings.
    pub fn retrieval_config(&self) -> RetrievalConfig {
        RetrievalConfig {
            top_k: self.retrieval.top_k,
            chunking: self.chunking.clone(),
            index: self.index,
        }
    }
}

impl Default for PolicyQaConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            chunking: ChunkerConfig::default(),
            retrieval: RetrievalYamlConfig::default(),
            index: IndexConfig::default(),
            semantic: SemanticConfig::default(),
            composer: ComposerConfig::default(),
            log_level: default_log_level(),
        }
    }
}

/// Retrieval section of the YAML file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalYamlConfig {
    /// Chunks handed to the composer per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalYamlConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    5
}
fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_valid_yaml() {
        let yaml = r#"
version: "1.0"
name: "health policy"
chunking:
  group_size: 2
retrieval:
  top_k: 3
"#;

        let config = PolicyQaConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.name, Some("health policy".to_string()));
        assert_eq!(config.chunking.group_size, 2);
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.semantic.mode, "fast");
        assert_eq!(config.composer.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
version: "1"
composer:
  provider: "openai"
  model: "gpt-4o-mini"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = PolicyQaConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.composer.provider, "openai");
        assert_eq!(config.retrieval.top_k, 5);
    }

    #[test]
    fn test_missing_file() {
        let err = PolicyQaConfig::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigLoadError::FileRead(_)));
    }

    #[test]
    fn test_default_config() {
        let config = PolicyQaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.log_level, "info");

        let retrieval = config.retrieval_config();
        assert_eq!(retrieval.top_k, 5);
        assert_eq!(retrieval.chunking.group_size, 3);
    }

    #[test]
    fn test_unsupported_version() {
        let err = PolicyQaConfig::from_yaml("version: \"2.0\"\n").unwrap_err();
        assert!(matches!(err, ConfigLoadError::UnsupportedVersion(v) if v == "2.0"));
    }

    #[test]
    fn test_zero_group_size_rejected() {
        let yaml = r#"
version: "1.0"
chunking:
  group_size: 0
"#;
        let err = PolicyQaConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("group_size"));
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let yaml = r#"
version: "1.0"
retrieval:
  top_k: 0
"#;
        let err = PolicyQaConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("top_k"));
    }

    #[test]
    fn test_api_mode_requires_url() {
        let yaml = r#"
version: "1.0"
semantic:
  mode: "api"
"#;
        let err = PolicyQaConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().starts_with("validation error: semantic"));
    }

    #[test]
    fn test_onnx_section_parses() {
        let yaml = r#"
version: "1.0"
semantic:
  mode: "onnx"
  model_name: "all-MiniLM-L6-v2"
  model_path: "models/all-MiniLM-L6-v2/onnx/model.onnx"
  tokenizer_path: "models/all-MiniLM-L6-v2/tokenizer.json"
  max_sequence_length: 128
"#;
        let config = PolicyQaConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.semantic.mode, "onnx");
        assert_eq!(config.semantic.max_sequence_length, 128);
        assert_eq!(
            config.semantic.tokenizer_path.as_deref(),
            Some(Path::new("models/all-MiniLM-L6-v2/tokenizer.json"))
        );
    }

    #[test]
    fn test_onnx_mode_requires_paths() {
        let yaml = r#"
version: "1.0"
semantic:
  mode: "onnx"
"#;
        let err = PolicyQaConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("model_path"));
    }

    #[test]
    fn test_retrieval_config_copies_index_settings() {
        let yaml = r#"
version: "1.0"
index:
  ann:
    enabled: true
    min_vectors_for_ann: 10
"#;
        let config = PolicyQaConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.retrieval_config().index, config.index);
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let yaml = r#"
version: "1.0"
composer:
  provider: "carrier-pigeon"
"#;
        let err = PolicyQaConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("carrier-pigeon"));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = PolicyQaConfig::from_yaml("version: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigLoadError::YamlParse(_)));
    }

    #[test]
    fn test_env_overrides_fill_secrets() {
        let mut config = PolicyQaConfig::default();
        config.apply_env_overrides(env(&[
            (GEMINI_API_KEY, "g-key"),
            (ENV_EMBEDDING_API_URL, "http://127.0.0.1:8080/embed"),
            (ENV_EMBEDDING_API_TOKEN, "hf-token"),
        ]));

        assert_eq!(config.composer.api_key.as_deref(), Some("g-key"));
        assert_eq!(config.semantic.mode, "api");
        assert_eq!(
            config.semantic.api_url.as_deref(),
            Some("http://127.0.0.1:8080/embed")
        );
        assert_eq!(
            config.semantic.api_auth_header.as_deref(),
            Some("Bearer hf-token")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_key_beats_gemini_key() {
        let mut config = PolicyQaConfig::default();
        config.apply_env_overrides(env(&[
            (ENV_LLM_API_KEY, "primary"),
            (GEMINI_API_KEY, "secondary"),
        ]));
        assert_eq!(config.composer.api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn test_gemini_key_ignored_for_openai() {
        let mut config = PolicyQaConfig::default();
        config.composer.provider = "openai".into();
        config.apply_env_overrides(env(&[(GEMINI_API_KEY, "g-key")]));
        assert!(config.composer.api_key.is_none());
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let mut config = PolicyQaConfig::default();
        config.composer.api_key = Some("from-file".into());
        config.apply_env_overrides(env(&[(ENV_LLM_API_KEY, "  "), (ENV_EMBEDDING_API_URL, "")]));
        assert_eq!(config.composer.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.semantic.mode, "fast");
    }
}
