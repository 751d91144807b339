use thiserror::Error;

/// Errors raised by completion providers.
///
/// [`AnswerComposer`](crate::AnswerComposer) never lets these escape from
/// `answer`/`respond`; they are logged and replaced by the fallback answer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("invalid composer config: {0}")]
    InvalidConfig(String),
    /// Transport failure, timeout or non-success HTTP status.
    #[error("LLM provider unavailable: {0}")]
    Unavailable(String),
    /// HTTP 429 from the provider.
    #[error("LLM provider rate limited: {0}")]
    RateLimited(String),
    #[error("malformed LLM response: {0}")]
    MalformedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        assert!(CompletionError::RateLimited("429".into())
            .to_string()
            .contains("rate limited"));
        assert!(CompletionError::Unavailable("timeout".into())
            .to_string()
            .contains("unavailable"));
    }
}
