use std::cmp::Ordering;

use crate::Neighbor;

/// Squared Euclidean distance between two equal-length vectors.
///
/// Extra trailing components on the longer side are ignored; callers check
/// dimensions first.
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Ascending distance, then ascending position.
pub(crate) fn by_distance_then_position(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.position.cmp(&b.position))
}

/// Exact top-`k` scan. `k` must be at least 1.
pub(crate) fn linear_search(vectors: &[Vec<f32>], query: &[f32], k: usize) -> Vec<Neighbor> {
    let mut scored: Vec<Neighbor> = vectors
        .iter()
        .enumerate()
        .map(|(position, v)| Neighbor {
            position,
            distance: squared_l2(query, v),
        })
        .collect();

    let k = k.min(scored.len());
    if k == 0 {
        return Vec::new();
    }
    if k < scored.len() {
        scored.select_nth_unstable_by(k - 1, by_distance_then_position);
        scored.truncate(k);
    }
    scored.sort_by(by_distance_then_position);
    scored
}
