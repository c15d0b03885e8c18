//! In-memory dense vector index with exhaustive cosine scoring.
//!
//! Corpora are small enough to hold every embedding in memory, and the
//! ranker needs a similarity for *every* document (not just the nearest
//! neighbours), so the index is a flat row-major matrix scanned in document
//! order. There is no approximate search structure to keep in sync.

use super::types::{validate_dimension, ScoreVector, SearchError};
use tracing::instrument;

/// Cosine similarity of two equal-length vectors.
///
/// Returns 0.0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(&x, &y)| x * y).sum();
    let mag_a = magnitude(a);
    let mag_b = magnitude(b);

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}

fn magnitude(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Embeddings for one corpus, index-aligned with its documents.
///
/// Document magnitudes are computed once at build time so a query costs one
/// dot product per document.
#[derive(Debug, Clone)]
pub struct SemanticIndex {
    /// Row-major `len * dimension` matrix
    vectors: Vec<f32>,
    /// L2 norm of each row
    magnitudes: Vec<f32>,
    dimension: usize,
}

impl SemanticIndex {
    /// Creates an empty index for vectors of `dimension`.
    pub fn new(dimension: usize) -> Self {
        Self {
            vectors: Vec::new(),
            magnitudes: Vec::new(),
            dimension,
        }
    }

    /// Builds an index from one embedding per document.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::DimensionMismatch` for the first embedding whose
    /// length differs from `dimension`.
    #[instrument(skip_all, fields(docs = embeddings.len(), dimension = dimension))]
    pub fn from_embeddings(
        dimension: usize,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Self, SearchError> {
        let mut index = Self::new(dimension);
        index.vectors.reserve(embeddings.len() * dimension);
        index.magnitudes.reserve(embeddings.len());
        for embedding in embeddings {
            index.push(embedding)?;
        }
        Ok(index)
    }

    fn push(&mut self, embedding: Vec<f32>) -> Result<(), SearchError> {
        validate_dimension(self.dimension, embedding.len())?;
        self.magnitudes.push(magnitude(&embedding));
        self.vectors.extend_from_slice(&embedding);
        Ok(())
    }

    /// Cosine similarity of `query_embedding` against every document, in
    /// document order.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::DimensionMismatch` if the query has the wrong
    /// dimension.
    pub fn score(&self, query_embedding: &[f32]) -> Result<ScoreVector, SearchError> {
        validate_dimension(self.dimension, query_embedding.len())?;

        let query_magnitude = magnitude(query_embedding);
        if self.magnitudes.is_empty() {
            return Ok(Vec::new());
        }
        if query_magnitude == 0.0 || self.dimension == 0 {
            return Ok(vec![0.0; self.magnitudes.len()]);
        }

        let scores = self
            .vectors
            .chunks_exact(self.dimension)
            .zip(self.magnitudes.iter())
            .map(|(row, &row_magnitude)| {
                if row_magnitude == 0.0 {
                    return 0.0;
                }
                let dot: f32 = row
                    .iter()
                    .zip(query_embedding.iter())
                    .map(|(&x, &y)| x * y)
                    .sum();
                dot / (row_magnitude * query_magnitude)
            })
            .collect();

        Ok(scores)
    }

    /// Embedding of the document at `position`.
    pub fn embedding(&self, position: usize) -> Option<&[f32]> {
        if position >= self.magnitudes.len() {
            return None;
        }
        let start = position * self.dimension;
        Some(&self.vectors[start..start + self.dimension])
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    /// Returns `true` if no documents are indexed.
    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Embedding dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}
