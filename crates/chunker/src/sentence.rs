use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkerConfig;
use crate::whitespace::collapse_whitespace;

/// Splits `text` into trimmed sentences.
///
/// Boundaries come from the UAX #29 sentence rules. A sentence whose last
/// word is one of the configured abbreviations is glued to the next one, so
/// "Dr. Rao" never ends up in two sentences. Numeric abbreviations ("No.",
/// "Rs.") are glued only when the next segment starts with a digit: "No. 4"
/// stays together while a bare "No." answer stands alone. Segments that are
/// empty after trimming are dropped.
pub fn split_sentences(text: &str, cfg: &ChunkerConfig) -> Vec<String> {
    let flattened;
    let source = if cfg.collapse_whitespace {
        flattened = collapse_whitespace(text);
        flattened.as_str()
    } else {
        text
    };

    let mut sentences: Vec<String> = Vec::new();
    let mut pending: Option<(String, Glue)> = None;

    for segment in source.split_sentence_bounds() {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let sentence = match pending.take() {
            Some((head, Glue::BeforeNumber)) if !starts_with_digit(segment) => {
                sentences.push(head);
                segment.to_string()
            }
            Some((mut head, _)) => {
                head.push(' ');
                head.push_str(segment);
                head
            }
            None => segment.to_string(),
        };

        match trailing_glue(&sentence, cfg) {
            Some(glue) => pending = Some((sentence, glue)),
            None => sentences.push(sentence),
        }
    }

    if let Some((rest, _)) = pending {
        sentences.push(rest);
    }

    sentences
}

/// How a sentence ending in an abbreviation attaches to the next segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Glue {
    Always,
    BeforeNumber,
}

fn trailing_glue(sentence: &str, cfg: &ChunkerConfig) -> Option<Glue> {
    let word = sentence.split_whitespace().next_back()?;
    if cfg.is_abbreviation(word) {
        Some(Glue::Always)
    } else if cfg.is_numeric_abbreviation(word) {
        Some(Glue::BeforeNumber)
    } else {
        None
    }
}

fn starts_with_digit(segment: &str) -> bool {
    segment.chars().next().is_some_and(|c| c.is_ascii_digit())
}
