//! Text embedding for retrieval.
//!
//! Every embedder implements the async [`Embedder`] trait: a batch of texts
//! goes in, one fixed-width vector per text comes out, in order.
//!
//! Three implementations ship with the crate:
//!
//! - [`ApiEmbedder`] posts batches to a remote inference endpoint (Hugging
//!   Face feature-extraction, OpenAI embeddings, or a custom `{"texts": [...]}`
//!   service) with `reqwest`.
//! - `OnnxEmbedder` (feature `onnx`, on by default) runs an exported
//!   sentence-transformer such as all-MiniLM-L6-v2 locally with
//!   `onnxruntime` and `tokenizers`.
//! - [`HashingEmbedder`] is an offline bag-of-words embedder keyed by
//!   `fxhash`. It needs no network and is fully deterministic.
//!
//! Provider failures are reported, never papered over: an unreachable
//! endpoint is [`SemanticError::Unavailable`], not a made-up vector.
//!
//! ```
//! use semantic::{embedder_from_config, Embedder, SemanticConfig};
//!
//! # tokio_test_block(async {
//! let embedder = embedder_from_config(&SemanticConfig::default()).unwrap();
//! let vectors = embedder
//!     .embed(&["Maternity is excluded.".to_string()])
//!     .await
//!     .unwrap();
//! assert_eq!(vectors[0].len(), 384);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::sync::Arc;

mod api;
mod config;
mod embedder;
mod error;
mod hashing;
mod normalize;
#[cfg(feature = "onnx")]
mod onnx;

pub use crate::api::ApiEmbedder;
pub use crate::config::{SemanticConfig, DEFAULT_DIMENSION, DEFAULT_MAX_SEQUENCE_LENGTH};
pub use crate::embedder::{Embedder, Embedding};
pub use crate::error::SemanticError;
pub use crate::hashing::HashingEmbedder;
#[cfg(feature = "onnx")]
pub use crate::onnx::OnnxEmbedder;

/// Builds the embedder selected by `cfg.mode`.
pub fn embedder_from_config(cfg: &SemanticConfig) -> Result<Arc<dyn Embedder>, SemanticError> {
    cfg.validate()?;
    let embedder: Arc<dyn Embedder> = match cfg.mode.as_str() {
        "api" => Arc::new(ApiEmbedder::from_config(cfg)?),
        #[cfg(feature = "onnx")]
        "onnx" => Arc::new(OnnxEmbedder::from_config(cfg)?),
        #[cfg(not(feature = "onnx"))]
        "onnx" => {
            return Err(SemanticError::InvalidConfig(
                "onnx mode needs the `onnx` feature".into(),
            ))
        }
        _ => Arc::new(HashingEmbedder::from_config(cfg)?),
    };
    tracing::debug!(mode = %cfg.mode, model = %embedder.model_name(), "embedder ready");
    Ok(embedder)
}
