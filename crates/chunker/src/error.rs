use thiserror::Error;

/// Errors that can occur while chunking a document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChunkError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
