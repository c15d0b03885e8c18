//! Tokenization for the BERT embedder.
//!
//! `TokenizerHandle` wraps a HuggingFace tokenizer with right-side truncation
//! and produces padded batches with attention masks ready for a forward pass.

use crate::error::EmbeddingError;
use tokenizers::tokenizer::{Tokenizer, TruncationDirection, TruncationParams, TruncationStrategy};

/// Token ids and attention mask for a batch, both row-major `rows * width`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBatch {
    /// Padded token ids
    pub ids: Vec<u32>,
    /// 1 for real tokens, 0 for padding
    pub attention_mask: Vec<u32>,
    /// Number of texts
    pub rows: usize,
    /// Length of the longest sequence
    pub width: usize,
}

/// Handle for a configured tokenizer.
///
/// # Examples
///
/// ```ignore
/// let tokenizer_bytes = std::fs::read("tokenizer.json")?;
/// let handle = TokenizerHandle::from_bytes(tokenizer_bytes, 128)?;
///
/// let batch = handle.encode_batch(&["hola mundo", "hello world"])?;
/// assert_eq!(batch.rows, 2);
/// ```
#[derive(Clone)]
pub struct TokenizerHandle {
    tokenizer: Tokenizer,
    max_length: usize,
    pad_id: u32,
}

impl TokenizerHandle {
    /// Creates a tokenizer from JSON bytes with truncation configured.
    ///
    /// # Errors
    ///
    /// Returns `EmbeddingError::TokenizerUnavailable` if the bytes are not a
    /// valid tokenizer, or `EmbeddingError::InvalidConfig` if truncation
    /// cannot be applied.
    pub fn from_bytes(tokenizer_bytes: Vec<u8>, max_length: usize) -> Result<Self, EmbeddingError> {
        let mut tokenizer = Tokenizer::from_bytes(tokenizer_bytes).map_err(|e| {
            EmbeddingError::TokenizerUnavailable(format!("Failed to deserialize tokenizer: {}", e))
        })?;

        configure_truncation(&mut tokenizer, max_length)?;

        let pad_id = tokenizer
            .get_padding()
            .map(|padding| padding.pad_id)
            .unwrap_or(0);

        Ok(Self {
            tokenizer,
            max_length,
            pad_id,
        })
    }

    /// Returns the configured maximum length.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Returns the vocabulary size.
    pub fn vocab_size(&self) -> usize {
        self.tokenizer.get_vocab_size(true)
    }

    /// Tokenizes text into token ids, special tokens included.
    ///
    /// # Errors
    ///
    /// Returns `EmbeddingError::TokenizationFailed` if encoding fails or
    /// yields no tokens.
    pub fn tokenize(&self, text: &str) -> Result<Vec<u32>, EmbeddingError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| EmbeddingError::TokenizationFailed(format!("Encoding failed: {}", e)))?;

        let ids = encoding.get_ids();
        if ids.is_empty() {
            return Err(EmbeddingError::TokenizationFailed(
                "Tokenizer returned no tokens".to_string(),
            ));
        }

        Ok(ids.to_vec())
    }

    /// Tokenizes every text and right-pads to the longest sequence.
    pub fn encode_batch(&self, texts: &[&str]) -> Result<EncodedBatch, EmbeddingError> {
        let sequences = texts
            .iter()
            .map(|text| self.tokenize(text))
            .collect::<Result<Vec<_>, _>>()?;

        let width = sequences.iter().map(Vec::len).max().unwrap_or(0);
        let rows = sequences.len();
        let mut ids = Vec::with_capacity(rows * width);
        let mut attention_mask = Vec::with_capacity(rows * width);

        for sequence in sequences {
            let padding = width - sequence.len();
            attention_mask.extend(std::iter::repeat(1).take(sequence.len()));
            attention_mask.extend(std::iter::repeat(0).take(padding));
            ids.extend(sequence);
            ids.extend(std::iter::repeat(self.pad_id).take(padding));
        }

        Ok(EncodedBatch {
            ids,
            attention_mask,
            rows,
            width,
        })
    }
}

fn configure_truncation(
    tokenizer: &mut Tokenizer,
    max_length: usize,
) -> Result<(), EmbeddingError> {
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length,
            stride: 0,
            strategy: TruncationStrategy::LongestFirst,
            direction: TruncationDirection::Right,
        }))
        .map_err(|e| {
            EmbeddingError::InvalidConfig(format!(
                "Failed to configure tokenizer truncation: {}",
                e
            ))
        })?;

    Ok(())
}
