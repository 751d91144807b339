use serde::{Deserialize, Serialize};

use crate::config::ChunkerConfig;
use crate::error::ChunkError;
use crate::sentence::split_sentences;

/// One retrievable unit: a window of consecutive sentences.
///
/// `id` is the 0-based position of the chunk in the sequence produced by
/// [`chunk`]; the vector index relies on that position to map search hits
/// back to chunks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: usize,
    pub text: String,
}

impl AsRef<str> for Chunk {
    fn as_ref(&self) -> &str {
        self.text.as_str()
    }
}

/// Splits `text` into chunks of `group_size` sentences using the default
/// segmentation settings.
pub fn chunk(text: &str, group_size: usize) -> Result<Vec<Chunk>, ChunkError> {
    chunk_with_config(text, &ChunkerConfig::default().with_group_size(group_size))
}

/// Splits `text` into sentence windows described by `cfg`.
///
/// Windows do not overlap. The last window holds the remaining
/// `sentences % group_size` sentences when that is non-zero. Sentences inside
/// a window are joined with a single space. Blank input yields no chunks.
pub fn chunk_with_config(text: &str, cfg: &ChunkerConfig) -> Result<Vec<Chunk>, ChunkError> {
    cfg.validate()?;

    let sentences = split_sentences(text, cfg);
    let chunks: Vec<Chunk> = sentences
        .chunks(cfg.group_size)
        .enumerate()
        .map(|(id, group)| Chunk {
            id,
            text: group.join(" "),
        })
        .collect();

    tracing::debug!(
        sentences = sentences.len(),
        chunks = chunks.len(),
        group_size = cfg.group_size,
        "chunked document"
    );

    Ok(chunks)
}
