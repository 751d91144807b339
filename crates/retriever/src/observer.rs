use std::time::Duration;

/// Hook for recording retrieval latency and hit counts.
///
/// Install one with [`Retriever::with_observer`](crate::Retriever::with_observer);
/// every session built by that retriever reports to it. Both methods default
/// to doing nothing, so implementors only override what they record.
pub trait RetrievalObserver: Send + Sync {
    /// Called once a session's chunks are embedded and indexed.
    fn on_session_built(&self, _chunks: usize, _dimension: usize, _latency: Duration) {}

    /// Called after every successful query.
    fn on_query(&self, _top_k: usize, _hits: usize, _latency: Duration) {}
}
