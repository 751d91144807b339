use std::sync::Arc;
use std::time::Instant;

use composer::{AnswerComposer, CompletionError};
use retriever::{RetrievalError, RetrievalSession, Retriever};
use semantic::{embedder_from_config, SemanticError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigLoadError, PolicyQaConfig};

/// Errors that can occur while answering questions about a document.
///
/// LLM failures do not appear here once the pipeline is running: the
/// composer degrades them to a fallback answer per question.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),
    #[error("embedder setup failed: {0}")]
    Semantic(#[from] SemanticError),
    #[error("completion provider setup failed: {0}")]
    Completion(#[from] CompletionError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigLoadError),
}

/// One answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question: String,
    pub answer: String,
}

/// Retrieval plus answer composition for one document at a time.
#[derive(Debug, Clone)]
pub struct PolicyAssistant {
    retriever: Retriever,
    composer: AnswerComposer,
}

impl PolicyAssistant {
    pub fn new(retriever: Retriever, composer: AnswerComposer) -> Self {
        Self {
            retriever,
            composer,
        }
    }

    /// Builds the embedder, retriever and completion provider described by `cfg`.
    pub fn from_config(cfg: &PolicyQaConfig) -> Result<Self, PipelineError> {
        cfg.validate()?;
        let embedder = embedder_from_config(&cfg.semantic)?;
        let retriever = Retriever::new(embedder, cfg.retrieval_config());
        let composer = AnswerComposer::from_config(&cfg.composer)?;
        tracing::debug!(
            embedder = %retriever.embedder().model_name(),
            provider = composer.provider_name(),
            "policy assistant ready"
        );
        Ok(Self::new(retriever, composer))
    }

    /// Indexes `document` once and answers every question against it, in order.
    ///
    /// Retrieval errors (empty document, unreachable embedder) abort the call.
    /// A failing LLM only degrades the affected answers.
    pub async fn answer_questions<Q: AsRef<str>>(
        &self,
        document: &str,
        questions: &[Q],
    ) -> Result<Vec<Answer>, PipelineError> {
        let start = Instant::now();
        let session = self.retriever.build_session(document).await?;

        let mut answers = Vec::with_capacity(questions.len());
        for question in questions {
            let question = question.as_ref();
            let answer = self.answer_question(&session, question).await?;
            answers.push(Answer {
                question: question.to_string(),
                answer,
            });
        }

        tracing::info!(
            questions = answers.len(),
            chunks = session.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "answered questions"
        );
        Ok(answers)
    }

    /// Retrieves the configured top-k clauses for `question` and composes an answer.
    pub async fn answer_question(
        &self,
        session: &RetrievalSession,
        question: &str,
    ) -> Result<String, PipelineError> {
        let hits = session.query_default(question).await?;
        tracing::debug!(
            question,
            clauses = hits.len(),
            chunk_ids = ?hits.iter().map(|h| h.chunk.id).collect::<Vec<_>>(),
            "retrieved clauses"
        );
        Ok(self.composer.respond(question, &hits).await)
    }

    /// Builds a session that can be shared across tasks for concurrent questions.
    pub async fn index_document(&self, document: &str) -> Result<Arc<RetrievalSession>, PipelineError> {
        Ok(Arc::new(self.retriever.build_session(document).await?))
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    pub fn composer(&self) -> &AnswerComposer {
        &self.composer
    }
}
