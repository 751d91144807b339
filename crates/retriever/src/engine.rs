use std::sync::Arc;

use semantic::Embedder;

use crate::observer::RetrievalObserver;
use crate::session::RetrievalSession;
use crate::types::{RetrievalConfig, RetrievalError};

/// Factory for [`RetrievalSession`]s that share one embedder and config.
///
/// Cloning is cheap; every clone points at the same embedder and observer.
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    config: RetrievalConfig,
    observer: Option<Arc<dyn RetrievalObserver>>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, config: RetrievalConfig) -> Self {
        Self {
            embedder,
            config,
            observer: None,
        }
    }

    /// Reports session builds and queries to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn RetrievalObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Chunks, embeds and indexes `text`.
    pub async fn build_session(&self, text: &str) -> Result<RetrievalSession, RetrievalError> {
        RetrievalSession::build(
            text,
            Arc::clone(&self.embedder),
            self.config.clone(),
            self.observer.clone(),
        )
        .await
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("model", &self.embedder.model_name())
            .field("config", &self.config)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
