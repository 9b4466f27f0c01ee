//! Vector index trait for nearest-neighbor search over embeddings.

use crate::document::Neighbor;
use crate::error::Result;

/// A read-only collection of embedding vectors supporting nearest-neighbor search.
///
/// Vectors are identified by their insertion position. An index is built once
/// per corpus and never mutated afterwards, so shared references may be
/// searched concurrently. [`FlatIndex`](crate::FlatIndex) is the exact
/// implementation; approximate backends can be substituted behind this trait
/// without touching the chunker or the retriever.
///
/// # Example
///
/// ```rust,ignore
/// use studymate_rag::{FlatIndex, VectorIndex};
///
/// let index = FlatIndex::build(vectors)?;
/// let hits = index.search(&query, 3)?;
/// ```
pub trait VectorIndex: Send + Sync {
    /// Return the `min(k, len())` stored vectors closest to `query`, ordered by
    /// ascending distance, ties broken by lower position.
    ///
    /// # Errors
    ///
    /// - [`RagError::ConfigError`](crate::RagError::ConfigError) if `k == 0`
    /// - [`RagError::DimensionMismatch`](crate::RagError::DimensionMismatch) if
    ///   `query.len() != dimensions()`
    /// - [`RagError::NonFiniteValue`](crate::RagError::NonFiniteValue) if the
    ///   query holds a NaN or infinite component
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>>;

    /// Number of stored vectors.
    fn len(&self) -> usize;

    /// Returns `true` if the index holds no vectors.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimensionality shared by every stored vector.
    fn dimensions(&self) -> usize;
}
