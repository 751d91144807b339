use async_trait::async_trait;
use fxhash::hash64;

use crate::config::SemanticConfig;
use crate::embedder::{Embedder, Embedding};
use crate::error::SemanticError;
use crate::normalize::l2_normalize_in_place;

/// Deterministic offline embedder used for `"fast"` mode.
///
/// Lowercased alphanumeric word tokens are hashed into `dimension` buckets
/// (bag of words). Texts that share keywords land close to each other, which
/// is enough for keyword-heavy policy questions and for tests that must not
/// touch the network.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    model_name: String,
    dimension: usize,
    normalize: bool,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Result<Self, SemanticError> {
        if dimension == 0 {
            return Err(SemanticError::InvalidConfig(
                "dimension must be greater than zero".into(),
            ));
        }
        Ok(Self {
            model_name: "hashing-bow".into(),
            dimension,
            normalize: true,
        })
    }

    pub fn from_config(cfg: &SemanticConfig) -> Result<Self, SemanticError> {
        Ok(Self::new(cfg.dimension)?.with_normalize(cfg.normalize))
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Synchronous form of [`Embedder::embed_one`].
    pub fn embed_text(&self, text: &str) -> Embedding {
        let mut v = vec![0f32; self.dimension];
        for token in tokens(text) {
            let bucket = (hash64(token.as_bytes()) % self.dimension as u64) as usize;
            v[bucket] += 1.0;
        }
        if self.normalize {
            l2_normalize_in_place(&mut v);
        }
        v
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

#[async_trait]
impl Embedder for HashingEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, SemanticError> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}
