//! Same input, same output: chunking, embedding and ranking are reproducible.

mod common;

use common::*;
use policyqa::{chunk, embedder_from_config, SemanticConfig};

#[test]
fn chunking_is_deterministic() {
    let first = chunk(POLICY, 2).unwrap();
    let second = chunk(POLICY, 2).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(first[1].text, HOSPITAL_CLAUSE);
}

#[tokio::test]
async fn embedding_same_text_twice_is_identical() {
    let embedder = embedder_from_config(&SemanticConfig::default()).unwrap();
    let a = embedder.embed_one(KNEE_CLAUSE).await.unwrap();
    let b = embedder.embed_one(KNEE_CLAUSE).await.unwrap();
    assert_eq!(a, b);

    let batch = embedder
        .embed(&[MATERNITY_CLAUSE.to_string(), KNEE_CLAUSE.to_string()])
        .await
        .unwrap();
    assert_eq!(batch[1], a, "batch position must not change the vector");
}

#[tokio::test]
async fn rebuilt_sessions_rank_identically() {
    let first = retriever(1, 3).build_session(POLICY).await.unwrap();
    let second = retriever(1, 3).build_session(POLICY).await.unwrap();

    for question in ["knee surgery waiting period", "maternity", "limits"] {
        let a = first.query(question, 3).await.unwrap();
        let b = second.query(question, 3).await.unwrap();
        assert_eq!(a, b, "ranking diverged for {question:?}");
    }
}

#[tokio::test]
async fn exact_chunk_text_is_top_hit_at_zero_distance() {
    let session = retriever(1, 3).build_session(POLICY).await.unwrap();
    for chunk in session.chunks() {
        let hits = session.query(&chunk.text, 3).await.unwrap();
        assert_eq!(hits[0].chunk.id, chunk.id);
        assert!(hits[0].distance.abs() < 1e-6, "distance {}", hits[0].distance);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
    }
}
