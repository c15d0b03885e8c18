//! Error types for polysearch-core.
//!
//! Search, build and loading errors live next to the code that raises them
//! ([`SearchError`](crate::search::SearchError),
//! [`StoreError`](crate::storage::StoreError)). This module holds the errors
//! shared by every embedder implementation.

use thiserror::Error;

/// Errors that can occur during embedding operations.
#[derive(Debug, Clone, Error)]
pub enum EmbeddingError {
    /// Failed to load model from bytes
    #[error("Failed to load model: {0}")]
    ModelLoad(String),
    /// Forward pass through the model failed
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    /// Failed to tokenize text
    #[error("Tokenization failed: {0}")]
    TokenizationFailed(String),
    /// Tokenizer not available or initialization failed
    #[error("Tokenizer unavailable: {0}")]
    TokenizerUnavailable(String),
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Embedder returned a vector of the wrong length
    #[error("Embedding has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        /// Dimension the embedder advertises
        expected: usize,
        /// Dimension actually produced
        actual: usize,
    },
}
