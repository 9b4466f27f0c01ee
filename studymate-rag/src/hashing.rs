//! Offline embedder based on feature hashing.
//!
//! [`HashingEmbedder`] needs no model or network: every lower-cased
//! alphanumeric token is hashed with xxh3 into one of `dimensions` buckets and
//! the resulting count vector is L2-normalized. Texts that share words end up
//! close together, which is enough for tests, demos and offline use.

use async_trait::async_trait;
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

use crate::embedding::Embedder;
use crate::error::{RagError, Result};

/// A deterministic bag-of-words [`Embedder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    /// Dimensionality used by [`HashingEmbedder::default`].
    pub const DEFAULT_DIMENSIONS: usize = 1024;

    /// Create an embedder producing vectors of length `dimensions`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `dimensions == 0`.
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(RagError::ConfigError("dimensions must be greater than zero".to_string()));
        }
        Ok(Self { dimensions })
    }

    /// Embed synchronously. Text without any alphanumeric token maps to the zero vector.
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];
        for token in tokens(text) {
            let bucket = (xxh3_64(token.as_bytes()) % self.dimensions as u64) as usize;
            embedding[bucket] += 1.0;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            embedding.iter_mut().for_each(|x| *x /= norm);
        }
        embedding
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self { dimensions: Self::DEFAULT_DIMENSIONS }
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()).map(str::to_lowercase)
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        debug!(provider = "Hashing", batch_size = texts.len(), "embedding batch");
        Ok(texts.iter().map(|text| self.embed_sync(text)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
