//! # Vector index
//!
//! Nearest-neighbour search over the embeddings of one document's chunks.
//!
//! The index is built once from an ordered list of vectors and is read-only
//! afterwards, so a single [`VectorIndex`] can be searched from many threads
//! without locking. Position `i` in the index is whatever the caller put at
//! position `i` when building it; the retriever uses that to map hits back to
//! chunk ids.
//!
//! ## Search tiers
//!
//! - **Exact** (default): a full scan with squared Euclidean distance and
//!   partial selection of the top `k`.
//! - **HNSW** (opt-in via [`AnnConfig`]): an approximate graph for very large
//!   documents. Distances are squared so both tiers report the same metric.
//!
//! Results are ordered by ascending distance, ties by ascending position.
//!
//! ```
//! use index::{IndexConfig, VectorIndex};
//!
//! let index = VectorIndex::build(
//!     vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]],
//!     &IndexConfig::default(),
//! )
//! .unwrap();
//!
//! let hits = index.search(&[1.0, 0.0], 2).unwrap();
//! assert_eq!(hits[0].position, 1);
//! assert_eq!(hits[0].distance, 0.0);
//! assert_eq!(hits[1].position, 2);
//! ```

pub mod ann;
mod exact;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::ann::AnnConfig;
use crate::ann::AnnGraph;
pub use crate::exact::squared_l2;

/// One search hit: the stored position and its squared L2 distance to the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub position: usize,
    pub distance: f32,
}

/// Config for building an index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Approximate search settings. Off by default.
    pub ann: AnnConfig,
}

impl IndexConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ann(mut self, ann: AnnConfig) -> Self {
        self.ann = ann;
        self
    }

    pub fn validate(&self) -> Result<(), IndexError> {
        if self.ann.enabled {
            if self.ann.m == 0 {
                return Err(IndexError::InvalidArgument("ann.m must be greater than zero".into()));
            }
            if self.ann.ef_construction == 0 || self.ann.ef_search == 0 {
                return Err(IndexError::InvalidArgument(
                    "ann.ef_construction and ann.ef_search must be greater than zero".into(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// `position` is the offending stored vector, or `None` for a query.
    #[error("dimension mismatch{}: expected {expected}, got {got}", at_position(.position))]
    DimensionMismatch {
        position: Option<usize>,
        expected: usize,
        got: usize,
    },
}

fn at_position(position: &Option<usize>) -> String {
    position.map(|p| format!(" at position {p}")).unwrap_or_default()
}

/// Immutable nearest-neighbour index over equal-length `f32` vectors.
pub struct VectorIndex {
    vectors: Vec<Vec<f32>>,
    dimension: usize,
    graph: Option<AnnGraph>,
}

impl VectorIndex {
    /// Builds an index over `embeddings`; position `i` is `embeddings[i]`.
    ///
    /// Every vector must share the first vector's length. An empty list is a
    /// valid, empty index.
    pub fn build(embeddings: Vec<Vec<f32>>, cfg: &IndexConfig) -> Result<Self, IndexError> {
        cfg.validate()?;

        let dimension = embeddings.first().map(Vec::len).unwrap_or(0);
        if !embeddings.is_empty() && dimension == 0 {
            return Err(IndexError::InvalidArgument(
                "embeddings must have at least one dimension".into(),
            ));
        }
        if let Some((position, v)) = embeddings
            .iter()
            .enumerate()
            .find(|(_, v)| v.len() != dimension)
        {
            return Err(IndexError::DimensionMismatch {
                position: Some(position),
                expected: dimension,
                got: v.len(),
            });
        }

        let graph = cfg
            .ann
            .should_use_ann(embeddings.len())
            .then(|| AnnGraph::build(&embeddings, &cfg.ann));

        log::debug!(
            "built vector index: vectors={} dimension={} ann={}",
            embeddings.len(),
            dimension,
            graph.is_some()
        );

        Ok(Self {
            vectors: embeddings,
            dimension,
            graph,
        })
    }

    /// Returns the `min(k, len)` nearest stored vectors to `query`.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError> {
        if k == 0 {
            return Err(IndexError::InvalidArgument("k must be greater than zero".into()));
        }
        if self.vectors.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                position: None,
                expected: self.dimension,
                got: query.len(),
            });
        }

        let wanted = k.min(self.vectors.len());
        let hits = match &self.graph {
            Some(graph) => {
                let hits = graph.search(query, k);
                if hits.len() < wanted {
                    log::debug!(
                        "HNSW returned {} of {wanted} neighbours; falling back to exact search",
                        hits.len()
                    );
                    exact::linear_search(&self.vectors, query, k)
                } else {
                    hits
                }
            }
            None => exact::linear_search(&self.vectors, query, k),
        };
        Ok(hits)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Shared vector length; 0 for an empty index.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Whether searches go through the HNSW graph.
    pub fn uses_ann(&self) -> bool {
        self.graph.is_some()
    }

    /// Stored vector at `position`.
    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        self.vectors.get(position).map(Vec::as_slice)
    }
}

impl fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorIndex")
            .field("len", &self.vectors.len())
            .field("dimension", &self.dimension)
            .field("uses_ann", &self.graph.is_some())
            .finish()
    }
}
