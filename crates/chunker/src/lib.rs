//! Sentence-window chunking for policy documents.
//!
//! The chunker turns the plain text of one document into an ordered list of
//! [`Chunk`]s. Each chunk is a run of consecutive sentences; by default three
//! of them.
//!
//! ## What we do
//!
//! - Flatten whitespace so PDF line breaks don't split sentences
//! - Segment sentences with the Unicode UAX #29 rules
//! - Re-join sentences that were cut after a known abbreviation ("Dr.", "No. 4")
//! - Group sentences into non-overlapping windows and number them from 0
//!
//! ## Pure function guarantee
//!
//! No I/O and no locale lookups. The same text and config always produce the
//! same chunks with the same ids.
//!
//! ```rust
//! use chunker::chunk;
//!
//! let chunks = chunk("Maternity is excluded. Dental is covered.", 1).unwrap();
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(chunks[1].id, 1);
//! assert_eq!(chunks[1].text, "Dental is covered.");
//! ```

mod chunk;
mod config;
mod error;
mod sentence;
mod whitespace;

pub use crate::chunk::{chunk, chunk_with_config, Chunk};
pub use crate::config::{ChunkerConfig, DEFAULT_ABBREVIATIONS, DEFAULT_NUMERIC_ABBREVIATIONS};
pub use crate::error::ChunkError;
pub use crate::sentence::split_sentences;
pub use crate::whitespace::collapse_whitespace;
