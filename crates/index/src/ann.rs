//! Approximate nearest-neighbour tier backed by an HNSW graph.
//!
//! Exact search is the default and is what the retrieval contract promises.
//! The graph is only worth building for large documents; below
//! [`AnnConfig::min_vectors_for_ann`] vectors (and always below
//! [`MIN_GRAPH_ELEMENTS`]) the index stays on the linear scan.
//!
//! ## Trade-offs
//!
//! - **Recall**: typically 95-99%, so a true neighbour can be missed
//! - **Build time**: graph construction costs more than the scan it replaces
//!   for small inputs

use hnsw_rs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::exact::by_distance_then_position;
use crate::Neighbor;

/// Below this many vectors the graph degenerates; exact search is used.
pub const MIN_GRAPH_ELEMENTS: usize = 10;

/// Configuration for HNSW construction and search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnConfig {
    /// Use the graph at all. Default: false (exact search).
    pub enabled: bool,
    /// Neighbours per node (higher = better recall, slower build). Default: 16
    pub m: usize,
    /// Candidate list size during construction. Default: 200
    pub ef_construction: usize,
    /// Candidate list size during search; raised to `k` when smaller. Default: 50
    pub ef_search: usize,
    /// Minimum number of vectors before the graph is built. Default: 1000
    pub min_vectors_for_ann: usize,
}

impl Default for AnnConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            m: 16,
            ef_construction: 200,
            ef_search: 50,
            min_vectors_for_ann: 1000,
        }
    }
}

impl AnnConfig {
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_m(mut self, m: usize) -> Self {
        self.m = m;
        self
    }

    pub fn with_ef_construction(mut self, ef: usize) -> Self {
        self.ef_construction = ef;
        self
    }

    pub fn with_ef_search(mut self, ef: usize) -> Self {
        self.ef_search = ef;
        self
    }

    pub fn with_min_vectors_for_ann(mut self, min: usize) -> Self {
        self.min_vectors_for_ann = min;
        self
    }

    /// Whether a graph should be built for `num_vectors` vectors.
    pub fn should_use_ann(&self, num_vectors: usize) -> bool {
        self.enabled
            && num_vectors >= self.min_vectors_for_ann
            && num_vectors >= MIN_GRAPH_ELEMENTS
    }
}

/// HNSW graph over the index's vectors, addressed by position.
pub(crate) struct AnnGraph {
    hnsw: Hnsw<'static, f32, DistL2>,
    ef_search: usize,
}

impl AnnGraph {
    pub(crate) fn build(vectors: &[Vec<f32>], config: &AnnConfig) -> Self {
        let nb_elem = vectors.len();
        let nb_layer = 16.min((nb_elem as f32).ln().trunc() as usize).max(1);

        let hnsw = Hnsw::<f32, DistL2>::new(
            config.m,
            nb_elem,
            nb_layer,
            config.ef_construction,
            DistL2 {},
        );
        let data_for_insertion: Vec<(&Vec<f32>, usize)> = vectors
            .iter()
            .enumerate()
            .map(|(position, v)| (v, position))
            .collect();
        hnsw.parallel_insert(&data_for_insertion);

        log::debug!("built HNSW graph: vectors={nb_elem} layers={nb_layer} m={}", config.m);
        Self {
            hnsw,
            ef_search: config.ef_search,
        }
    }

    /// Approximate top-`k`. `DistL2` reports plain Euclidean distance, so
    /// values are squared to match the exact path.
    pub(crate) fn search(&self, query: &[f32], k: usize) -> Vec<Neighbor> {
        let ef = self.ef_search.max(k);
        let mut hits: Vec<Neighbor> = self
            .hnsw
            .search(query, k, ef)
            .into_iter()
            .map(|neighbour| Neighbor {
                position: neighbour.get_origin_id(),
                distance: neighbour.distance * neighbour.distance,
            })
            .collect();
        hits.sort_by(by_distance_then_position);
        hits.truncate(k);
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_ann_off() {
        let config = AnnConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.m, 16);
        assert_eq!(config.ef_construction, 200);
        assert_eq!(config.ef_search, 50);
        assert_eq!(config.min_vectors_for_ann, 1000);
        assert!(!config.should_use_ann(100_000));
    }

    #[test]
    fn builder_sets_fields() {
        let config = AnnConfig::default()
            .with_enabled(true)
            .with_m(32)
            .with_ef_construction(400)
            .with_ef_search(100)
            .with_min_vectors_for_ann(500);
        assert!(config.enabled);
        assert_eq!(config.m, 32);
        assert_eq!(config.ef_construction, 400);
        assert_eq!(config.ef_search, 100);
        assert_eq!(config.min_vectors_for_ann, 500);
    }

    #[test]
    fn threshold_respected() {
        let config = AnnConfig::default().with_enabled(true);
        assert!(config.should_use_ann(1000));
        assert!(!config.should_use_ann(999));

        let tiny = config.with_min_vectors_for_ann(1);
        assert!(!tiny.should_use_ann(MIN_GRAPH_ELEMENTS - 1));
        assert!(tiny.should_use_ann(MIN_GRAPH_ELEMENTS));
    }

    #[test]
    fn graph_finds_exact_match() {
        let vectors: Vec<Vec<f32>> = (0..50).map(|i| vec![i as f32, (i % 7) as f32]).collect();
        let graph = AnnGraph::build(&vectors, &AnnConfig::default().with_enabled(true));
        let hits = graph.search(&[20.0, 6.0], 3);
        assert!(!hits.is_empty());
        assert_eq!(hits[0].position, 20);
        assert!(hits[0].distance.abs() < 1e-6);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
    }
}
