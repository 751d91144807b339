use chunker::{Chunk, ChunkError, ChunkerConfig};
use index::{IndexConfig, IndexError};
use semantic::SemanticError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration shared by every session a [`Retriever`](crate::Retriever) builds.
///
/// Cheap to clone and serde-friendly so it can be embedded in higher-level
/// configs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalConfig {
    /// Number of chunks returned by [`query_default`](crate::RetrievalSession::query_default).
    #[serde(default = "RetrievalConfig::default_top_k")]
    pub top_k: usize,
    /// Sentence grouping used when the document is chunked.
    #[serde(default)]
    pub chunking: ChunkerConfig,
    /// Vector index settings.
    #[serde(default)]
    pub index: IndexConfig,
}

impl RetrievalConfig {
    pub(crate) fn default_top_k() -> usize {
        5
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_group_size(mut self, group_size: usize) -> Self {
        self.chunking.group_size = group_size;
        self
    }

    pub fn with_index(mut self, index: IndexConfig) -> Self {
        self.index = index;
        self
    }

    pub fn validate(&self) -> Result<(), RetrievalError> {
        if self.top_k == 0 {
            return Err(RetrievalError::InvalidArgument(
                "top_k must be greater than zero".into(),
            ));
        }
        self.chunking.validate()?;
        self.index.validate()?;
        Ok(())
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: Self::default_top_k(),
            chunking: ChunkerConfig::default(),
            index: IndexConfig::default(),
        }
    }
}

/// A chunk paired with its squared L2 distance to the query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub chunk: Chunk,
    pub distance: f32,
}

impl AsRef<str> for SearchResult {
    fn as_ref(&self) -> &str {
        &self.chunk.text
    }
}

/// Errors produced by the retrieval layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RetrievalError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The document produced zero chunks.
    #[error("document contains no retrievable text")]
    EmptyDocument,
    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    /// The embedding provider could not be reached.
    #[error("embedding provider unavailable: {0}")]
    EmbeddingUnavailable(String),
    /// The embedding provider answered with something unusable, or was misconfigured.
    #[error("embedding error: {0}")]
    Embedding(String),
    /// An internal invariant did not hold.
    #[error("internal retrieval error: {0}")]
    Internal(String),
}

impl From<ChunkError> for RetrievalError {
    fn from(err: ChunkError) -> Self {
        match err {
            ChunkError::InvalidArgument(msg) => RetrievalError::InvalidArgument(msg),
        }
    }
}

impl From<IndexError> for RetrievalError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::InvalidArgument(msg) => RetrievalError::InvalidArgument(msg),
            IndexError::DimensionMismatch { expected, got, .. } => {
                RetrievalError::DimensionMismatch { expected, got }
            }
        }
    }
}

impl From<SemanticError> for RetrievalError {
    fn from(err: SemanticError) -> Self {
        match err {
            SemanticError::Unavailable(msg) => RetrievalError::EmbeddingUnavailable(msg),
            other => RetrievalError::Embedding(other.to_string()),
        }
    }
}
