//! Whitespace normalization applied before sentence segmentation.
//!
//! Text extracted from PDFs carries hard line breaks in the middle of
//! sentences. UAX #29 treats a line feed as a paragraph separator and would
//! cut the sentence in two, so the chunker flattens every whitespace run to a
//! single ASCII space first.
//!
//! ```rust
//! use chunker::collapse_whitespace;
//!
//! assert_eq!(collapse_whitespace("covered after\na 2 year\r\n  wait"), "covered after a 2 year wait");
//! assert_eq!(collapse_whitespace("   \n\t  "), "");
//! ```

/// Collapses every run of Unicode whitespace into one ASCII space and trims
/// both ends.
pub fn collapse_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}
