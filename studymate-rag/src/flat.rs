//! Exact nearest-neighbor index using squared Euclidean distance.
//!
//! [`FlatIndex`] stores all vectors in one contiguous row-major buffer and
//! scans every row on each query. That is exact and deterministic, and fast
//! enough for the document sets of a single session.

use tracing::debug;

use crate::document::Neighbor;
use crate::error::{RagError, Result};
use crate::vectorindex::VectorIndex;

/// An in-memory, brute-force [`VectorIndex`].
#[derive(Debug, Clone, PartialEq)]
pub struct FlatIndex {
    dimensions: usize,
    /// `len * dimensions` values, row `i` at `[i * dimensions..(i + 1) * dimensions]`.
    data: Vec<f32>,
}

/// Squared Euclidean distance between two vectors of equal length.
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

// A NaN distance would sort ahead of or behind every finite one depending on
// its sign bit, so non-finite input never reaches the scan.
fn ensure_finite(vector: &[f32], context: impl FnOnce() -> String) -> Result<()> {
    if vector.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(RagError::NonFiniteValue { context: context() })
    }
}

impl FlatIndex {
    /// Build an index from `n` rows of equal length.
    ///
    /// Row `i` is stored at position `i`.
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyCorpus`] if `vectors` is empty
    /// - [`RagError::DimensionMismatch`] if the first row is empty or any row's
    ///   length differs from the first row's
    /// - [`RagError::NonFiniteValue`] if any component is NaN or infinite
    pub fn build(vectors: Vec<Vec<f32>>) -> Result<Self> {
        let first = vectors.first().ok_or(RagError::EmptyCorpus)?;
        let dimensions = first.len();
        if dimensions == 0 {
            return Err(RagError::DimensionMismatch {
                expected: 1,
                actual: 0,
                context: "row 0".to_string(),
            });
        }

        let mut data = Vec::with_capacity(vectors.len() * dimensions);
        for (row, vector) in vectors.iter().enumerate() {
            if vector.len() != dimensions {
                return Err(RagError::DimensionMismatch {
                    expected: dimensions,
                    actual: vector.len(),
                    context: format!("row {row}"),
                });
            }
            ensure_finite(vector, || format!("row {row}"))?;
            data.extend_from_slice(vector);
        }

        debug!(rows = vectors.len(), dimensions, "built flat index");
        Ok(Self { dimensions, data })
    }

    /// Return the stored vector at `position`, if any.
    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        let start = position.checked_mul(self.dimensions)?;
        let end = start.checked_add(self.dimensions)?;
        self.data.get(start..end)
    }

    fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.dimensions)
    }
}

impl VectorIndex for FlatIndex {
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if k == 0 {
            return Err(RagError::ConfigError("k must be greater than zero".to_string()));
        }
        if query.len() != self.dimensions {
            return Err(RagError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
                context: "query vector".to_string(),
            });
        }
        ensure_finite(query, || "query vector".to_string())?;

        let mut scored: Vec<Neighbor> = self
            .rows()
            .enumerate()
            .map(|(position, row)| Neighbor { position, distance: squared_l2(row, query) })
            .collect();

        scored.sort_by(|a, b| {
            a.distance.total_cmp(&b.distance).then_with(|| a.position.cmp(&b.position))
        });
        scored.truncate(k);
        Ok(scored)
    }

    fn len(&self) -> usize {
        self.data.len() / self.dimensions
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
