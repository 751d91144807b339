//! Document in, answers out: retrieval and composition wired together.

mod common;

use std::sync::Arc;

use common::*;
use policyqa::{
    chunk, split_sentences, ChunkerConfig, CompletionError, PipelineError, RetrievalError,
    DEFAULT_FALLBACK_ANSWER,
};

#[tokio::test]
async fn knee_surgery_query_finds_first_sentence() {
    let session = retriever(1, 5).build_session(POLICY).await.unwrap();
    assert_eq!(session.len(), 3);
    assert_eq!(session.chunks()[0].text, KNEE_CLAUSE);
    assert_eq!(session.chunks()[1].text, MATERNITY_CLAUSE);
    assert_eq!(session.chunks()[2].text, HOSPITAL_CLAUSE);

    let hits = session
        .query("waiting period for knee surgery", 1)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].chunk.id, 0);
}

#[tokio::test]
async fn assistant_answers_from_retrieved_clause() {
    let provider = ClauseEchoProvider::new();
    let assistant = assistant(provider.clone(), 1, 1);

    let answers = assistant
        .answer_questions(POLICY, &["waiting period for knee surgery"])
        .await
        .unwrap();

    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].question, "waiting period for knee surgery");
    assert_eq!(answers[0].answer, KNEE_CLAUSE);

    // intent parse, then the answering prompt carrying the intent verbatim
    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].ends_with("User Query: waiting period for knee surgery"));
    assert!(prompts[1].contains(INTENT_JSON));
    assert!(prompts[1].contains(KNEE_CLAUSE));
    assert!(!prompts[1].contains(MATERNITY_CLAUSE));
}

#[tokio::test]
async fn answers_follow_question_order() {
    let assistant = assistant(ClauseEchoProvider::new(), 1, 1);
    let questions = [
        "Is maternity excluded?",
        "waiting period for knee surgery",
        "Is hospitalization covered up to limits?",
    ];

    let answers = assistant.answer_questions(POLICY, &questions).await.unwrap();

    let got: Vec<(&str, &str)> = answers
        .iter()
        .map(|a| (a.question.as_str(), a.answer.as_str()))
        .collect();
    assert_eq!(
        got,
        vec![
            (questions[0], MATERNITY_CLAUSE),
            (questions[1], KNEE_CLAUSE),
            (questions[2], HOSPITAL_CLAUSE),
        ]
    );
}

#[tokio::test]
async fn default_grouping_keeps_short_policy_in_one_chunk() {
    let provider = ClauseEchoProvider::new();
    let assistant = assistant(provider.clone(), 3, 5);

    let answers = assistant
        .answer_questions(POLICY, &["Is maternity covered?"])
        .await
        .unwrap();

    let whole = format!("{KNEE_CLAUSE} {MATERNITY_CLAUSE} {HOSPITAL_CLAUSE}");
    assert_eq!(answers[0].answer, whole);
}

#[tokio::test]
async fn empty_document_is_rejected() {
    let assistant = assistant(ClauseEchoProvider::new(), 1, 1);

    for document in ["", "   \n\t  "] {
        let err = assistant
            .answer_questions(document, &["anything"])
            .await
            .unwrap_err();
        assert!(
            matches!(err, PipelineError::Retrieval(RetrievalError::EmptyDocument)),
            "unexpected error for {document:?}: {err}"
        );
    }
}

#[tokio::test]
async fn failing_llm_degrades_every_answer() {
    let provider = Arc::new(FailingProvider(CompletionError::Unavailable(
        "connection refused".into(),
    )));
    let assistant = assistant(provider, 1, 2);

    let answers = assistant
        .answer_questions(POLICY, &["Is knee surgery covered?", "Is maternity covered?"])
        .await
        .unwrap();

    assert_eq!(answers.len(), 2);
    for answer in answers {
        assert_eq!(answer.answer, DEFAULT_FALLBACK_ANSWER);
    }
}

#[tokio::test]
async fn no_questions_still_indexes_document() {
    let assistant = assistant(ClauseEchoProvider::new(), 1, 1);
    let answers = assistant
        .answer_questions::<&str>(POLICY, &[])
        .await
        .unwrap();
    assert!(answers.is_empty());
}

#[test]
fn chunks_cover_every_sentence_once() {
    let text = "Clause 1. Dr. Rao approves claims.\nClause 2 covers day care.  Clause 3 excludes cosmetic surgery. \
        Clause 4 lists a 30 day initial waiting period. Clause 5 ends here.";
    let cfg = ChunkerConfig::default();
    let sentences = split_sentences(text, &cfg);

    for group_size in 1..=4 {
        let chunks = chunk(text, group_size).unwrap();
        let rebuilt = chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(rebuilt, sentences.join(" "), "group_size {group_size}");
        assert_eq!(chunks.len(), sentences.len().div_ceil(group_size));
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.id, i);
        }
    }
}
