//! Trait for text embedding functions.
//!
//! The engine never depends on a concrete model. Corpus builds and queries go
//! through [`Embedder`], so the same ranking code runs against the Candle
//! BERT model, the feature-hashing embedder, or a test double.

use crate::error::EmbeddingError;

/// Text embedding model.
///
/// # Contract
///
/// - deterministic: the same text always yields the same vector
/// - every vector has exactly [`embedding_dim`](Self::embedding_dim) entries
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. Corpus builds call `embed_batch`
/// from one scoped thread per language at the same time, and queries call
/// `embed` from any thread holding the engine.
///
/// # Examples
///
/// ```
/// use polysearch_core::embedding::{Embedder, HashingEmbedder};
///
/// let embedder = HashingEmbedder::new(64);
/// let vector = embedder.embed("electric vehicles").unwrap();
/// assert_eq!(vector.len(), embedder.embedding_dim());
/// ```
pub trait Embedder: Send + Sync {
    /// Returns the embedding dimension (vector size).
    fn embedding_dim(&self) -> usize;

    /// Embeds a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embeds many texts, one vector per input in input order.
    ///
    /// The default calls [`embed`](Self::embed) per text. Model-backed
    /// implementations override it to run batched inference.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}

/// Checks that `embedding` has the dimension `embedder` advertises.
pub(crate) fn check_dimension(
    embedder: &dyn Embedder,
    embedding: &[f32],
) -> Result<(), EmbeddingError> {
    let expected = embedder.embedding_dim();
    if embedding.len() != expected {
        return Err(EmbeddingError::DimensionMismatch {
            expected,
            actual: embedding.len(),
        });
    }
    Ok(())
}
