use crate::error::EmbeddingError;
use crate::language::Language;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-document scores, index-aligned with a corpus's document order.
pub type ScoreVector = Vec<f32>;

/// A document in one language's corpus.
///
/// Immutable once loaded; owned by its corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier, unique within the corpus
    pub id: String,
    /// Display title
    pub title: String,
    /// Full text (indexed lexically and embedded)
    pub text: String,
    /// Source URL
    pub url: String,
    /// Corpus language
    pub language: Language,
}

/// One ranked hit.
///
/// Carries the fused score plus both normalized constituent scores so
/// callers can see why a document ranked where it did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    /// Corpus the document came from
    pub language: Language,
    /// Document title
    pub title: String,
    /// Full stored text (no excerpting)
    pub text: String,
    /// Document URL
    pub url: String,
    /// `weight * semantic + (1 - weight) * bm25`
    pub fused_score: f32,
    /// Min-max normalized cosine similarity
    pub semantic_score: f32,
    /// Min-max normalized BM25 score
    pub bm25_score: f32,
}

/// A corpus whose contribution was dropped from a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageFailure {
    /// Affected corpus
    pub language: Language,
    /// Human-readable cause
    pub reason: String,
}

/// Output of [`SearchEngine::search`](super::SearchEngine::search).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Language used to pick fusion weights (detected or fallback)
    pub primary_language: Language,
    /// Merged results, fused score descending, capped
    pub results: Vec<RankedResult>,
    /// Corpora that could not be scored for this query
    pub failures: Vec<LanguageFailure>,
}

/// Index statistics for one corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusStats {
    /// Corpus language
    pub language: Language,
    /// Number of documents
    pub document_count: usize,
    /// Distinct normalized terms
    pub vocabulary_size: usize,
    /// Mean normalized document length in tokens
    pub average_document_length: f32,
    /// Embedding dimension of the semantic index
    pub embedding_dim: usize,
}

/// Error types for search operations.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// Query was empty or whitespace-only
    #[error("Empty query")]
    EmptyQuery,
    /// Embedding generation failed
    #[error("Embedding error: {0}")]
    Embedding(String),
    /// Vector dimension mismatch (expected vs actual)
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected embedding dimension
        expected: usize,
        /// Actual embedding dimension received
        actual: usize,
    },
    /// A score vector does not line up with its corpus
    #[error("Score vector has {actual} entries, corpus has {expected} documents")]
    ScoreLengthMismatch {
        /// Corpus size
        expected: usize,
        /// Score vector length
        actual: usize,
    },
    /// The corpus failed to build and is not served
    #[error("Corpus '{language}' unavailable: {reason}")]
    CorpusUnavailable {
        /// Affected corpus
        language: Language,
        /// Build failure
        reason: String,
    },
    /// Every configured corpus failed to build
    #[error("No corpus could be built")]
    NoCorporaAvailable,
    /// Loader or storage backend error
    #[error("Storage error: {0}")]
    Storage(String),
    /// Configuration out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<EmbeddingError> for SearchError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::DimensionMismatch { expected, actual } => {
                SearchError::DimensionMismatch { expected, actual }
            }
            other => SearchError::Embedding(other.to_string()),
        }
    }
}

/// Validates that an embedding has the expected dimension.
///
/// Returns `Ok(())` if dimensions match, or `Err(SearchError::DimensionMismatch)` otherwise.
pub fn validate_dimension(expected: usize, actual: usize) -> Result<(), SearchError> {
    if actual == expected {
        Ok(())
    } else {
        Err(SearchError::DimensionMismatch { expected, actual })
    }
}
