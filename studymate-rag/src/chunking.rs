//! Document chunking.
//!
//! Text is split into character windows of bounded length. With an overlap
//! of zero the windows partition the text exactly; with a positive overlap
//! each window starts `max_len - overlap` characters after the previous one.
//! Window boundaries are measured in Unicode scalar values, so a chunk never
//! splits a UTF-8 code point.

use crate::config::RagConfig;
use crate::document::{Chunk, Document};
use crate::error::{RagError, Result};

/// A strategy for splitting text into retrievable pieces.
///
/// Implementations return borrowed slices of the input; corpus positions are
/// assigned afterwards by [`chunk_documents`].
pub trait Chunker: Send + Sync {
    /// Split `text` into chunks. Returns an empty `Vec` for empty text.
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Splits text into fixed-size character windows with configurable overlap.
///
/// # Example
///
/// ```rust,ignore
/// use studymate_rag::{Chunker, FixedSizeChunker};
///
/// let chunker = FixedSizeChunker::new(256, 32)?;
/// let pieces = chunker.split(&text);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSizeChunker {
    max_len: usize,
    overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Arguments
    ///
    /// * `max_len` - maximum number of characters per chunk
    /// * `overlap` - number of characters shared by consecutive chunks
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] unless `max_len > 0` and `overlap < max_len`.
    pub fn new(max_len: usize, overlap: usize) -> Result<Self> {
        validate_window(max_len, overlap)?;
        Ok(Self { max_len, overlap })
    }

    /// Create a chunker from the chunking fields of a [`RagConfig`].
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Maximum number of characters per chunk.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Number of characters shared by consecutive chunks.
    pub fn overlap(&self) -> usize {
        self.overlap
    }
}

impl Chunker for FixedSizeChunker {
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        windows(text, self.max_len, self.overlap)
    }
}

/// Split `text` into windows of at most `max_len` characters.
///
/// # Errors
///
/// Returns [`RagError::ConfigError`] unless `max_len > 0` and `overlap < max_len`.
pub fn chunk_text(text: &str, max_len: usize, overlap: usize) -> Result<Vec<&str>> {
    validate_window(max_len, overlap)?;
    Ok(windows(text, max_len, overlap))
}

/// Chunk every document in order, numbering chunks across the whole batch.
///
/// The returned positions are contiguous from zero and match the row order the
/// chunks will have in the vector index.
pub fn chunk_documents(chunker: &dyn Chunker, documents: &[Document]) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    for document in documents {
        for piece in chunker.split(&document.text) {
            chunks.push(Chunk {
                position: chunks.len(),
                document_id: document.id.clone(),
                text: piece.to_string(),
            });
        }
    }
    chunks
}

fn validate_window(max_len: usize, overlap: usize) -> Result<()> {
    if max_len == 0 {
        return Err(RagError::ConfigError("max_len must be greater than zero".to_string()));
    }
    if overlap >= max_len {
        return Err(RagError::ConfigError(format!(
            "overlap ({overlap}) must be less than max_len ({max_len})"
        )));
    }
    Ok(())
}

/// Sliding character windows. Assumes a validated `max_len` and `overlap`.
fn windows(text: &str, max_len: usize, overlap: usize) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }

    // Byte offset of every character boundary, including the end of the text.
    let bounds: Vec<usize> =
        text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len())).collect();
    let char_count = bounds.len() - 1;
    let step = max_len - overlap;

    let mut chunks = Vec::with_capacity(char_count.div_ceil(step));
    let mut start = 0;
    loop {
        let end = (start + max_len).min(char_count);
        chunks.push(&text[bounds[start]..bounds[end]]);
        if end == char_count {
            break;
        }
        start += step;
    }

    chunks
}
