use std::sync::Arc;
use std::time::Instant;

use chunker::{chunk_with_config, Chunk};
use index::VectorIndex;
use semantic::Embedder;

use crate::observer::RetrievalObserver;
use crate::types::{RetrievalConfig, RetrievalError, SearchResult};


/// Built, queryable state for one document.
///
/// A session owns the document's chunks and their index. It is immutable
/// after construction: share it behind an `Arc` and query it from as many
/// tasks as needed.
pub struct RetrievalSession {
    chunks: Vec<Chunk>,
    index: VectorIndex,
    embedder: Arc<dyn Embedder>,
    config: RetrievalConfig,
    observer: Option<Arc<dyn RetrievalObserver>>,
}

impl RetrievalSession {
    /// Chunks `text`, embeds every chunk in one batch, and indexes the result.
    pub async fn new(
        text: &str,
        embedder: Arc<dyn Embedder>,
        config: &RetrievalConfig,
    ) -> Result<Self, RetrievalError> {
        Self::build(text, embedder, config.clone(), None).await
    }

    pub(crate) async fn build(
        text: &str,
        embedder: Arc<dyn Embedder>,
        config: RetrievalConfig,
        observer: Option<Arc<dyn RetrievalObserver>>,
    ) -> Result<Self, RetrievalError> {
        config.validate()?;
        let start = Instant::now();

        let chunks = chunk_with_config(text, &config.chunking)?;
        if chunks.is_empty() {
            return Err(RetrievalError::EmptyDocument);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder.embed(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(RetrievalError::Internal(format!(
                "embedder returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let index = VectorIndex::build(embeddings, &config.index)?;
        let latency = start.elapsed();

        tracing::info!(
            chunks = chunks.len(),
            dimension = index.dimension(),
            ann = index.uses_ann(),
            model = %embedder.model_name(),
            latency_ms = latency.as_millis() as u64,
            "retrieval session built"
        );
        if let Some(observer) = &observer {
            observer.on_session_built(chunks.len(), index.dimension(), latency);
        }

        Ok(Self {
            chunks,
            index,
            embedder,
            config,
            observer,
        })
    }

    /// Returns the `min(top_k, len)` chunks closest to `text`, nearest first.
    pub async fn query(&self, text: &str, top_k: usize) -> Result<Vec<SearchResult>, RetrievalError> {
        if top_k == 0 {
            return Err(RetrievalError::InvalidArgument(
                "top_k must be greater than zero".into(),
            ));
        }
        let start = Instant::now();

        let embedding = self.embedder.embed_one(text).await?;
        let neighbors = self.index.search(&embedding, top_k)?;

        let results = neighbors
            .into_iter()
            .map(|neighbor| {
                self.chunks
                    .get(neighbor.position)
                    .cloned()
                    .map(|chunk| SearchResult {
                        chunk,
                        distance: neighbor.distance,
                    })
                    .ok_or_else(|| {
                        RetrievalError::Internal(format!(
                            "index position {} has no chunk ({} chunks)",
                            neighbor.position,
                            self.chunks.len()
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let latency = start.elapsed();
        tracing::debug!(
            top_k,
            hits = results.len(),
            best_distance = results.first().map(|r| r.distance),
            latency_ms = latency.as_millis() as u64,
            "retrieval query"
        );
        if let Some(observer) = &self.observer {
            observer.on_query(top_k, results.len(), latency);
        }

        Ok(results)
    }

    /// [`query`](Self::query) with the configured `top_k`.
    pub async fn query_default(&self, text: &str) -> Result<Vec<SearchResult>, RetrievalError> {
        self.query(text, self.config.top_k).await
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn chunk(&self, id: usize) -> Option<&Chunk> {
        self.chunks.get(id)
    }

    /// Number of chunks (and indexed vectors).
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Always false: empty documents are rejected at build time.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.index.dimension()
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }
}

impl std::fmt::Debug for RetrievalSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalSession")
            .field("chunks", &self.chunks.len())
            .field("index", &self.index)
            .field("model", &self.embedder.model_name())
            .field("config", &self.config)
            .finish()
    }
}
