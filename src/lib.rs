//! Workspace umbrella crate for policy-document question answering.
//!
//! This crate stitches retrieval (`chunker`, `semantic`, `index`,
//! `retriever`) and answer composition (`composer`) into one
//! [`PolicyAssistant`], and loads the whole pipeline's settings from a YAML
//! file via [`PolicyQaConfig`].
//!
//! ```no_run
//! use policyqa::{PolicyAssistant, PolicyQaConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = PolicyQaConfig::from_file("policyqa.yaml")?;
//! config.apply_env_overrides(|key| std::env::var(key).ok());
//!
//! let assistant = PolicyAssistant::from_config(&config)?;
//! let document = std::fs::read_to_string("policy.txt")?;
//! for answer in assistant
//!     .answer_questions(&document, &["Is knee surgery covered?"])
//!     .await?
//! {
//!     println!("{}: {}", answer.question, answer.answer);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
mod pipeline;

pub use crate::config::{ConfigLoadError, PolicyQaConfig, RetrievalYamlConfig};
pub use crate::pipeline::{Answer, PipelineError, PolicyAssistant};

pub use chunker::{chunk, chunk_with_config, split_sentences, Chunk, ChunkError, ChunkerConfig};
pub use composer::{
    AnswerComposer, CompletionError, CompletionProvider, ComposerConfig, GeminiProvider,
    OpenAiProvider, DEFAULT_FALLBACK_ANSWER, NOT_FOUND_ANSWER,
};
pub use index::{AnnConfig, IndexConfig, IndexError, Neighbor, VectorIndex};
pub use retriever::{
    RetrievalConfig, RetrievalError, RetrievalObserver, RetrievalSession, Retriever, SearchResult,
};
pub use semantic::{
    embedder_from_config, ApiEmbedder, Embedder, Embedding, HashingEmbedder, SemanticConfig,
    SemanticError,
};
#[cfg(feature = "onnx")]
pub use semantic::OnnxEmbedder;
