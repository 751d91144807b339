use index::{AnnConfig, IndexConfig, IndexError, VectorIndex};

/// Small deterministic vectors so the demo needs no embedder.
fn synthetic_vectors(count: usize, dimension: usize) -> Vec<Vec<f32>> {
    (0..count)
        .map(|i| {
            (0..dimension)
                .map(|d| ((i * 31 + d * 17) % 97) as f32 / 97.0)
                .collect()
        })
        .collect()
}

fn main() -> Result<(), IndexError> {
    let vectors = synthetic_vectors(2_000, 32);
    let query = vectors[42].clone();

    let exact = VectorIndex::build(vectors.clone(), &IndexConfig::default())?;
    let ann_cfg = IndexConfig::new().with_ann(
        AnnConfig::default()
            .with_enabled(true)
            .with_min_vectors_for_ann(1_000),
    );
    let approximate = VectorIndex::build(vectors, &ann_cfg)?;

    println!(
        "Indexed {} vectors of dimension {} (ann: {}).",
        approximate.len(),
        approximate.dimension(),
        approximate.uses_ann()
    );

    let exact_hits = exact.search(&query, 5)?;
    let ann_hits = approximate.search(&query, 5)?;

    println!("Exact hits: {exact_hits:#?}");
    println!("HNSW hits: {ann_hits:#?}");

    Ok(())
}
