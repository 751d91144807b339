use async_trait::async_trait;

use crate::error::SemanticError;

/// A dense vector produced by an [`Embedder`].
pub type Embedding = Vec<f32>;

/// Maps text to fixed-length vectors.
///
/// Implementations must return exactly one vector per input, in input order,
/// and every vector from one embedder must have the same length. The same
/// text must always map to the same vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Label of the underlying model.
    fn model_name(&self) -> &str;

    /// Vector length when known before the first call.
    fn dimension(&self) -> Option<usize>;

    /// Embeds a batch of texts.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, SemanticError>;

    /// Embeds a single text.
    async fn embed_one(&self, text: &str) -> Result<Embedding, SemanticError> {
        let vectors = self.embed(&[text.to_string()]).await?;
        let count = vectors.len();
        match (count, vectors.into_iter().next()) {
            (1, Some(vector)) => Ok(vector),
            _ => Err(SemanticError::MalformedResponse(format!(
                "expected 1 vector for a single text, got {count}"
            ))),
        }
    }
}

/// Checks that `vectors` holds `expected` entries of one shared, non-zero width.
pub(crate) fn check_batch_shape(
    vectors: &[Embedding],
    expected: usize,
) -> Result<(), SemanticError> {
    if vectors.len() != expected {
        return Err(SemanticError::MalformedResponse(format!(
            "expected {expected} vectors, got {}",
            vectors.len()
        )));
    }
    if let Some(first) = vectors.first() {
        let dim = first.len();
        if dim == 0 {
            return Err(SemanticError::MalformedResponse(
                "embedding vectors must not be empty".into(),
            ));
        }
        if let Some((position, ragged)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dim) {
            return Err(SemanticError::MalformedResponse(format!(
                "vector {position} has {} dimensions, expected {dim}",
                ragged.len()
            )));
        }
    }
    Ok(())
}
