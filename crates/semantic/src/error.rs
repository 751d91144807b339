use thiserror::Error;

/// Errors surfaced by embedders.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SemanticError {
    /// Configuration is inconsistent (e.g., `api` mode without an `api_url`).
    #[error("invalid semantic config: {0}")]
    InvalidConfig(String),
    /// The embedding provider could not be reached, timed out, or answered
    /// with a non-success status.
    #[error("embedding provider unavailable: {0}")]
    Unavailable(String),
    /// The provider answered, but the payload was not a usable set of vectors.
    #[error("malformed embedding response: {0}")]
    MalformedResponse(String),
    /// Local model loading, tokenization or inference failed.
    #[error("embedding inference failed: {0}")]
    Inference(String),
}

impl SemanticError {
    /// True when the failure came from the provider being unreachable.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SemanticError::Unavailable(_))
    }
}
