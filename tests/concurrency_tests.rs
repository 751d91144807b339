//! Concurrency tests: one session shared across tasks, no locking.

mod common;

use std::sync::Arc;

use common::*;

static QUESTIONS: [&str; 6] = [
    "waiting period for knee surgery",
    "Is maternity excluded?",
    "Is hospitalization covered up to limits?",
    "knee surgery",
    "what is excluded",
    "covered limits",
];

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_queries_match_sequential() {
    let session = Arc::new(retriever(1, 3).build_session(POLICY).await.unwrap());

    let mut sequential = Vec::new();
    for question in QUESTIONS {
        sequential.push(session.query(question, 3).await.unwrap());
    }

    let handles: Vec<_> = (0..8)
        .flat_map(|_| QUESTIONS.iter())
        .map(|question| {
            let session = Arc::clone(&session);
            let question = question.to_string();
            tokio::spawn(async move { session.query(&question, 3).await })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let concurrent = handle.await.unwrap().unwrap();
        assert_eq!(
            concurrent,
            sequential[i % QUESTIONS.len()],
            "task {i} diverged from the sequential result",
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_answers_share_one_session() {
    let assistant = assistant(ClauseEchoProvider::new(), 1, 1);
    let session = assistant.index_document(POLICY).await.unwrap();

    let expected = [KNEE_CLAUSE, MATERNITY_CLAUSE, HOSPITAL_CLAUSE];
    let handles: Vec<_> = QUESTIONS[..3]
        .iter()
        .map(|question| {
            let assistant = assistant.clone();
            let session = Arc::clone(&session);
            let question = question.to_string();
            tokio::spawn(async move { assistant.answer_question(&session, &question).await })
        })
        .collect();

    for (handle, expected) in handles.into_iter().zip(expected) {
        assert_eq!(handle.await.unwrap().unwrap(), expected);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn independent_sessions_do_not_interfere() {
    let retriever = retriever(1, 1);
    let other_policy = "Dental care is excluded. Ambulance charges are covered.";

    let (a, b) = tokio::join!(
        retriever.build_session(POLICY),
        retriever.build_session(other_policy)
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.len(), 3);
    assert_eq!(b.len(), 2);

    let hit_a = a.query("knee surgery", 1).await.unwrap();
    let hit_b = b.query("ambulance charges", 1).await.unwrap();
    assert_eq!(hit_a[0].chunk.text, KNEE_CLAUSE);
    assert_eq!(hit_b[0].chunk.text, "Ambulance charges are covered.");
}
