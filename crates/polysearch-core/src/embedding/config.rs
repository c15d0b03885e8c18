//! Configuration for the BERT sentence embedder.

use serde::{Deserialize, Serialize};

/// Default multilingual sentence encoder (384-dimensional, 50+ languages).
pub const DEFAULT_MODEL_ID: &str = "sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2";

/// Texts per forward pass when embedding a corpus.
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Settings for [`BertEmbedder`](super::BertEmbedder) that are not part of
/// the model's own `config.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentenceModelConfig {
    /// Model identifier, for logs
    pub model_id: String,

    /// Token limit per text; longer inputs are truncated on the right
    pub max_sequence_length: usize,

    /// Whether to L2-normalize pooled embeddings
    pub normalize_embeddings: bool,

    /// Maximum texts per forward pass; bounds peak memory during corpus builds
    pub batch_size: usize,
}

impl Default for SentenceModelConfig {
    fn default() -> Self {
        // sentence-transformers trains this model with 128-token inputs
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            max_sequence_length: 128,
            normalize_embeddings: true,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// The fields of a HuggingFace BERT `config.json` the embedder reads
/// directly.
#[derive(Clone, Copy, Debug, Deserialize)]
pub(crate) struct BertDimensions {
    pub hidden_size: usize,
    pub max_position_embeddings: usize,
}
