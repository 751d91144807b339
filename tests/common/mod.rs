//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use policyqa::{
    AnswerComposer, CompletionError, CompletionProvider, ComposerConfig, Embedder, Embedding,
    HashingEmbedder, PolicyAssistant, RetrievalConfig, Retriever, SemanticError,
};

pub const POLICY: &str = "Knee surgery is covered after a 2 year waiting period. \
    Maternity is excluded. Hospitalization is covered up to limits.";

pub const KNEE_CLAUSE: &str = "Knee surgery is covered after a 2 year waiting period.";
pub const MATERNITY_CLAUSE: &str = "Maternity is excluded.";
pub const HOSPITAL_CLAUSE: &str = "Hospitalization is covered up to limits.";

pub const INTENT_JSON: &str =
    r#"{"intent":"coverage_check","entity":"knee surgery","attributes":["waiting period"]}"#;

pub fn hashing_embedder() -> Arc<dyn Embedder> {
    Arc::new(HashingEmbedder::new(384).expect("valid dimension"))
}

pub fn retriever(group_size: usize, top_k: usize) -> Retriever {
    Retriever::new(
        hashing_embedder(),
        RetrievalConfig::default()
            .with_group_size(group_size)
            .with_top_k(top_k),
    )
}

pub fn assistant(provider: Arc<dyn CompletionProvider>, group_size: usize, top_k: usize) -> PolicyAssistant {
    PolicyAssistant::new(
        retriever(group_size, top_k),
        AnswerComposer::new(provider, ComposerConfig::default()),
    )
}

/// Answers intent prompts with [`INTENT_JSON`] and answering prompts with the
/// first retrieved clause, recording every prompt it sees.
#[derive(Default)]
pub struct ClauseEchoProvider {
    prompts: Mutex<Vec<String>>,
}

impl ClauseEchoProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ClauseEchoProvider {
    fn name(&self) -> &str {
        "clause-echo"
    }

    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if prompt.contains("User Query:") {
            return Ok(INTENT_JSON.to_string());
        }
        let first_clause = prompt
            .split("Relevant Policy Clauses:\n")
            .nth(1)
            .and_then(|rest| rest.split("\n\n").next())
            .unwrap_or_default();
        Ok(first_clause.to_string())
    }
}

/// Every call fails.
pub struct FailingProvider(pub CompletionError);

#[async_trait]
impl CompletionProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        Err(self.0.clone())
    }
}

/// Every batch fails with the given error.
pub struct FailingEmbedder(pub SemanticError);

#[async_trait]
impl Embedder for FailingEmbedder {
    fn model_name(&self) -> &str {
        "failing"
    }

    fn dimension(&self) -> Option<usize> {
        None
    }

    async fn embed(&self, _texts: &[String]) -> Result<Vec<Embedding>, SemanticError> {
        Err(self.0.clone())
    }
}
