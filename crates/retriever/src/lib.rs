//! # Retriever (`retriever`)
//!
//! ## Purpose
//!
//! `retriever` turns one document into a queryable [`RetrievalSession`] and
//! answers "which chunks are closest to this question?" against it. It wires
//! together the three lower layers:
//!
//! - `chunker` splits the text into sentence windows
//! - `semantic` embeds every chunk in a single batch
//! - `index` stores the vectors for nearest-neighbour search
//!
//! Position `i` in the index is always chunk id `i`.
//!
//! ## Core Types
//!
//! - [`Retriever`]: embedder + [`RetrievalConfig`]; builds sessions.
//! - [`RetrievalSession`]: chunks and index for one document. Read-only once
//!   built, so it can be shared across tasks behind an `Arc`.
//! - [`SearchResult`]: a chunk and its squared L2 distance to the query,
//!   nearest first.
//!
//! ## Example Usage
//!
//! ```
//! use std::sync::Arc;
//! use retriever::{RetrievalConfig, Retriever};
//! use semantic::HashingEmbedder;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let embedder = Arc::new(HashingEmbedder::new(384).unwrap());
//! let retriever = Retriever::new(embedder, RetrievalConfig::default().with_group_size(1));
//!
//! let session = retriever
//!     .build_session(
//!         "Knee surgery is covered after a 2 year waiting period. \
//!          Maternity is excluded. Hospitalization is covered up to limits.",
//!     )
//!     .await
//!     .unwrap();
//!
//! let hits = session.query("waiting period for knee surgery", 1).await.unwrap();
//! assert_eq!(hits[0].chunk.id, 0);
//! # });
//! ```
//!
//! ## Observability
//!
//! Sessions emit `tracing` events. Install a [`RetrievalObserver`] with
//! [`Retriever::with_observer`] to record build and query latency
//! alongside hit counts.

mod engine;
mod observer;
mod session;
mod types;

pub use crate::engine::Retriever;
pub use crate::observer::RetrievalObserver;
pub use crate::session::RetrievalSession;
pub use crate::types::{RetrievalConfig, RetrievalError, SearchResult};

pub use chunker::Chunk;
