//! Configuration for the chunker.
//!
//! ```rust
//! use chunker::ChunkerConfig;
//!
//! let cfg = ChunkerConfig::default();
//! assert_eq!(cfg.group_size, 3);
//! assert!(cfg.collapse_whitespace);
//!
//! let single = ChunkerConfig { group_size: 1, ..Default::default() };
//! assert!(single.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ChunkError;

/// Abbreviations that end in a period but rarely end a sentence in policy
/// wording. Matching is case-insensitive on the last word of a sentence.
pub const DEFAULT_ABBREVIATIONS: &[&str] = &[
    "mr.", "mrs.", "ms.", "dr.", "sr.", "jr.", "st.", "vs.", "viz.", "e.g.", "i.e.",
];

/// Abbreviations that only hold a sentence open when a number follows
/// ("No. 4", "Rs. 5000", "Sec. 12"). A bare "No." is an answer, not a label.
pub const DEFAULT_NUMERIC_ABBREVIATIONS: &[&str] =
    &["no.", "nos.", "rs.", "approx.", "fig.", "sec.", "cl.", "art."];

/// Controls sentence segmentation and grouping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkerConfig {
    /// Number of consecutive sentences per chunk. Must be at least 1.
    #[serde(default = "ChunkerConfig::default_group_size")]
    pub group_size: usize,

    /// Flatten whitespace runs (including line breaks) before segmentation.
    #[serde(default = "default_true")]
    pub collapse_whitespace: bool,

    /// Sentence-final words that should not close a sentence.
    #[serde(default = "ChunkerConfig::default_abbreviations")]
    pub abbreviations: Vec<String>,

    /// Sentence-final words that stay attached only to a following number.
    #[serde(default = "ChunkerConfig::default_numeric_abbreviations")]
    pub numeric_abbreviations: Vec<String>,
}

impl ChunkerConfig {
    pub(crate) fn default_group_size() -> usize {
        3
    }

    pub(crate) fn default_abbreviations() -> Vec<String> {
        DEFAULT_ABBREVIATIONS.iter().map(|s| s.to_string()).collect()
    }

    pub(crate) fn default_numeric_abbreviations() -> Vec<String> {
        DEFAULT_NUMERIC_ABBREVIATIONS
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Returns a copy with a different group size.
    pub fn with_group_size(mut self, group_size: usize) -> Self {
        self.group_size = group_size;
        self
    }

    pub fn validate(&self) -> Result<(), ChunkError> {
        if self.group_size == 0 {
            return Err(ChunkError::InvalidArgument(
                "group_size must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub(crate) fn is_abbreviation(&self, word: &str) -> bool {
        contains_word(&self.abbreviations, word)
    }

    pub(crate) fn is_numeric_abbreviation(&self, word: &str) -> bool {
        contains_word(&self.numeric_abbreviations, word)
    }
}

fn contains_word(list: &[String], word: &str) -> bool {
    list.iter().any(|abbr| abbr.eq_ignore_ascii_case(word))
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            group_size: Self::default_group_size(),
            collapse_whitespace: true,
            abbreviations: Self::default_abbreviations(),
            numeric_abbreviations: Self::default_numeric_abbreviations(),
        }
    }
}

fn default_true() -> bool {
    true
}
