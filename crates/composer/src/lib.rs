//! Answer composition for policy questions.
//!
//! An [`AnswerComposer`] takes a question and the clauses retrieved for it,
//! builds a grounded prompt, and asks a [`CompletionProvider`] for the
//! answer. Optionally it first asks the provider to restate the question as
//! JSON (intent, entity, attributes) and pastes that restatement into the
//! prompt as-is.
//!
//! Provider errors are contained here: callers always get text back, either
//! the model's answer or the configured fallback.
//!
//! Two HTTP providers are included, [`GeminiProvider`] and
//! [`OpenAiProvider`]; anything else can implement the trait.

mod composer;
mod config;
mod error;
mod gemini;
mod openai;
pub mod prompt;
mod provider;

pub use crate::composer::AnswerComposer;
pub use crate::config::ComposerConfig;
pub use crate::error::CompletionError;
pub use crate::gemini::GeminiProvider;
pub use crate::openai::OpenAiProvider;
pub use crate::prompt::{DEFAULT_FALLBACK_ANSWER, NOT_FOUND_ANSWER};
pub use crate::provider::{provider_from_config, CompletionProvider};
