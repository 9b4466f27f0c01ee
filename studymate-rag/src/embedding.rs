//! Embedder trait for mapping text to dense vectors.

use async_trait::async_trait;

use crate::error::Result;

/// A model that maps text to fixed-dimension embedding vectors.
///
/// Implementations wrap a specific backend (a hosted API, a local model, the
/// offline [`HashingEmbedder`](crate::HashingEmbedder)) behind one async
/// interface. Output must be deterministic for identical input and
/// [`dimensions`](Embedder::dimensions) must not change during a session.
///
/// When the backend cannot be reached, implementations return
/// [`RagError::EmbeddingUnavailable`](crate::RagError::EmbeddingUnavailable);
/// they never substitute zero vectors.
///
/// # Example
///
/// ```rust,ignore
/// use studymate_rag::Embedder;
///
/// let embedding = embedder.embed_one("hello world").await?;
/// assert_eq!(embedding.len(), embedder.dimensions());
/// ```
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate one embedding vector per input, in input order.
    ///
    /// The default implementation calls [`embed_one`](Embedder::embed_one)
    /// sequentially for each input. Override this method if the backend
    /// supports native batch embedding.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed_one(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this embedder.
    fn dimensions(&self) -> usize;
}
