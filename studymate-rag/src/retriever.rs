//! Corpus construction and top-k retrieval.
//!
//! A [`Corpus`] pairs the chunk list of one upload batch with the
//! [`VectorIndex`] built from exactly those chunks, so index position `i`
//! always names chunk `i`. A [`Retriever`] embeds a question, searches the
//! index and maps the hits back to chunk text.
//!
//! # Example
//!
//! ```rust,ignore
//! use studymate_rag::{Corpus, FixedSizeChunker, HashingEmbedder, Retriever};
//!
//! let embedder = Arc::new(HashingEmbedder::default());
//! let chunker = FixedSizeChunker::new(500, 0)?;
//! let corpus = Arc::new(Corpus::build(&documents, &chunker, embedder.as_ref()).await?);
//! let retriever = Retriever::new(embedder, corpus);
//! let passages = retriever.retrieve("What color is the sky?", 3).await?;
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::chunking::{Chunker, chunk_documents};
use crate::document::{Chunk, Document, RetrievedChunk};
use crate::embedding::Embedder;
use crate::error::{RagError, Result};
use crate::flat::FlatIndex;
use crate::vectorindex::VectorIndex;

/// The chunks of one upload batch together with their vector index.
///
/// Immutable once built. Replacing a corpus means building a new one.
pub struct Corpus {
    chunks: Vec<Chunk>,
    index: Box<dyn VectorIndex>,
}

impl fmt::Debug for Corpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Corpus")
            .field("chunks", &self.chunks.len())
            .field("dimensions", &self.index.dimensions())
            .finish()
    }
}

impl Corpus {
    /// Chunk, embed and index a batch of documents with an exact [`FlatIndex`].
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyCorpus`] if the documents produce no chunks; the
    ///   embedder is not called in that case
    /// - any error returned by the embedder, unchanged
    /// - [`RagError::EmbeddingUnavailable`] if the embedder returns a number of
    ///   vectors different from the number of chunks
    /// - [`RagError::DimensionMismatch`] if the returned vectors are ragged
    /// - [`RagError::NonFiniteValue`] if a returned vector holds NaN or infinity
    pub async fn build(
        documents: &[Document],
        chunker: &dyn Chunker,
        embedder: &dyn Embedder,
    ) -> Result<Self> {
        let chunks = chunk_documents(chunker, documents);
        if chunks.is_empty() {
            error!(documents = documents.len(), "no chunks produced from upload batch");
            return Err(RagError::EmptyCorpus);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let vectors = embedder.embed(&texts).await.map_err(|e| {
            error!(chunk_count = chunks.len(), error = %e, "embedding failed while building corpus");
            e
        })?;
        if vectors.len() != chunks.len() {
            error!(expected = chunks.len(), actual = vectors.len(), "embedder returned wrong vector count");
            return Err(RagError::EmbeddingUnavailable {
                provider: "embedder".to_string(),
                message: format!("returned {} vectors for {} inputs", vectors.len(), chunks.len()),
            });
        }

        let index = FlatIndex::build(vectors)?;
        info!(documents = documents.len(), chunk_count = chunks.len(), "built corpus");
        Self::from_parts(chunks, Box::new(index))
    }

    /// Pair an existing chunk list with an index built from the same chunks,
    /// in the same order. Lets callers plug in a different index backend.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if the index and chunk list differ in length.
    pub fn from_parts(chunks: Vec<Chunk>, index: Box<dyn VectorIndex>) -> Result<Self> {
        if index.len() != chunks.len() {
            return Err(RagError::ConfigError(format!(
                "index holds {} vectors but corpus has {} chunks",
                index.len(),
                chunks.len()
            )));
        }
        Ok(Self { chunks, index })
    }

    /// The chunks in position order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// The vector index over [`chunks`](Corpus::chunks).
    pub fn index(&self) -> &dyn VectorIndex {
        self.index.as_ref()
    }

    /// Number of chunks in the corpus.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns `true` if the corpus holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Answers top-k queries against one [`Corpus`].
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    corpus: Arc<Corpus>,
}

impl fmt::Debug for Retriever {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retriever").field("corpus", &self.corpus).finish_non_exhaustive()
    }
}

impl Retriever {
    /// Create a retriever over `corpus` using `embedder` for questions.
    pub fn new(embedder: Arc<dyn Embedder>, corpus: Arc<Corpus>) -> Self {
        Self { embedder, corpus }
    }

    /// The corpus this retriever searches.
    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    /// Return up to `k` chunks closest to `question`, most relevant first.
    ///
    /// The result has exactly as many entries as the index search returned:
    /// `min(k, corpus.len())`.
    ///
    /// # Errors
    ///
    /// Errors from the embedder and the index propagate unchanged.
    pub async fn retrieve(&self, question: &str, k: usize) -> Result<Vec<RetrievedChunk>> {
        let query = self.embedder.embed_one(question).await.map_err(|e| {
            error!(error = %e, "embedding failed during retrieval");
            e
        })?;

        let neighbors = self.corpus.index.search(&query, k).map_err(|e| {
            error!(error = %e, "index search failed");
            e
        })?;

        let mut results = Vec::with_capacity(neighbors.len());
        for neighbor in neighbors {
            let chunk = self.corpus.chunks.get(neighbor.position).ok_or_else(|| {
                RagError::ConfigError(format!(
                    "index returned position {} outside corpus of {} chunks",
                    neighbor.position,
                    self.corpus.len()
                ))
            })?;
            results.push(RetrievedChunk { chunk: chunk.clone(), distance: neighbor.distance });
        }

        debug!(k, result_count = results.len(), "retrieved chunks");
        Ok(results)
    }
}
