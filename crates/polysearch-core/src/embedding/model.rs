//! BERT sentence embedder using the Candle ML framework.
//!
//! Loads a HuggingFace BERT checkpoint (safetensors weights, `config.json`,
//! `tokenizer.json`) and produces sentence embeddings by masked mean pooling
//! over the last hidden state, the way sentence-transformers does.

use super::config::{BertDimensions, SentenceModelConfig};
use super::tokenizer::{EncodedBatch, TokenizerHandle};
use super::traits::Embedder;
use crate::error::EmbeddingError;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;
use tracing::{debug, info, instrument};

/// File names expected in a model directory.
pub const WEIGHTS_FILE: &str = "model.safetensors";
/// HuggingFace model config file name.
pub const CONFIG_FILE: &str = "config.json";
/// HuggingFace tokenizer file name.
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Sentence embedder over a BERT encoder.
///
/// # Examples
///
/// ```ignore
/// let embedder = BertEmbedder::from_dir("models/minilm", SentenceModelConfig::default())?;
/// let embedding = embedder.embed("¿Dónde está la biblioteca?")?;
/// assert_eq!(embedding.len(), embedder.embedding_dim());
/// ```
pub struct BertEmbedder {
    model: BertModel,
    tokenizer: TokenizerHandle,
    config: SentenceModelConfig,
    hidden_size: usize,
    device: Device,
}

impl BertEmbedder {
    /// Loads `model.safetensors`, `config.json` and `tokenizer.json` from
    /// `dir`.
    ///
    /// # Errors
    ///
    /// Returns `EmbeddingError::ModelLoad` if a file cannot be read or the
    /// weights do not match the config.
    pub fn from_dir(
        dir: impl AsRef<Path>,
        config: SentenceModelConfig,
    ) -> Result<Self, EmbeddingError> {
        let dir = dir.as_ref();
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read(&path).map_err(|e| {
                EmbeddingError::ModelLoad(format!("Failed to read {}: {}", path.display(), e))
            })
        };

        Self::from_bytes(
            read(WEIGHTS_FILE)?,
            &read(CONFIG_FILE)?,
            read(TOKENIZER_FILE)?,
            config,
        )
    }

    /// Creates an embedder from raw file contents.
    #[instrument(skip_all, fields(model = %config.model_id))]
    pub fn from_bytes(
        model_bytes: Vec<u8>,
        config_bytes: &[u8],
        tokenizer_bytes: Vec<u8>,
        config: SentenceModelConfig,
    ) -> Result<Self, EmbeddingError> {
        info!(
            "Loading embedding model '{}' ({:.2}MB)",
            config.model_id,
            model_bytes.len() as f64 / 1_000_000.0
        );

        let bert_config: Config = serde_json::from_slice(config_bytes)
            .map_err(|e| EmbeddingError::ModelLoad(format!("Invalid config.json: {}", e)))?;
        let dims: BertDimensions = serde_json::from_slice(config_bytes)
            .map_err(|e| EmbeddingError::ModelLoad(format!("Invalid config.json: {}", e)))?;

        if config.max_sequence_length == 0 {
            return Err(EmbeddingError::InvalidConfig(
                "max_sequence_length must be positive".to_string(),
            ));
        }
        if config.batch_size == 0 {
            return Err(EmbeddingError::InvalidConfig(
                "batch_size must be positive".to_string(),
            ));
        }
        let max_length = config.max_sequence_length.min(dims.max_position_embeddings);
        let tokenizer = TokenizerHandle::from_bytes(tokenizer_bytes, max_length)?;

        if model_bytes.len() < 8 {
            return Err(EmbeddingError::ModelLoad(
                "Model file too small".to_string(),
            ));
        }

        let device = Self::select_device();
        let vb = VarBuilder::from_buffered_safetensors(model_bytes, DType::F32, &device)
            .map_err(|e| EmbeddingError::ModelLoad(format!("Failed to create VarBuilder: {}", e)))?;
        let model = BertModel::load(vb, &bert_config)
            .map_err(|e| EmbeddingError::ModelLoad(format!("Failed to create BertModel: {}", e)))?;

        info!(
            "Model ready: {}d hidden, {} max tokens",
            dims.hidden_size, max_length
        );

        Ok(Self {
            model,
            tokenizer,
            config,
            hidden_size: dims.hidden_size,
            device,
        })
    }

    /// Returns the embedder settings.
    pub fn config(&self) -> &SentenceModelConfig {
        &self.config
    }

    /// Selects the best available compute device.
    pub fn select_device() -> Device {
        if let Ok(cuda_device) = Device::new_cuda(0) {
            info!("Using CUDA GPU");
            return cuda_device;
        }

        if let Ok(metal_device) = Device::new_metal(0) {
            info!("Using Metal GPU");
            return metal_device;
        }

        info!("Using CPU");
        Device::Cpu
    }

    fn forward(&self, batch: &EncodedBatch) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let shape = (batch.rows, batch.width);
        let input_ids = Tensor::from_vec(batch.ids.clone(), shape, &self.device)
            .map_err(|e| EmbeddingError::InferenceFailed(format!("Failed to create tensor: {}", e)))?;
        let attention_mask = Tensor::from_vec(batch.attention_mask.clone(), shape, &self.device)
            .map_err(|e| EmbeddingError::InferenceFailed(format!("Failed to create mask: {}", e)))?;
        let token_type_ids = input_ids
            .zeros_like()
            .map_err(|e| EmbeddingError::InferenceFailed(format!("Failed to create tensor: {}", e)))?;

        // [rows, width] -> [rows, width, hidden]
        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))
            .map_err(|e| EmbeddingError::InferenceFailed(format!("Forward pass failed: {}", e)))?;

        let pooled = Self::mean_pool(&hidden, &attention_mask)?;
        let pooled = if self.config.normalize_embeddings {
            Self::normalize_l2(&pooled)?
        } else {
            pooled
        };

        pooled
            .to_vec2::<f32>()
            .map_err(|e| EmbeddingError::InferenceFailed(format!("Failed to convert to vec: {}", e)))
    }

    /// Mean over real tokens only: `sum(hidden * mask) / sum(mask)`.
    fn mean_pool(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor, EmbeddingError> {
        let pool = || -> candle_core::Result<Tensor> {
            let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
            let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
            let counts = mask.sum(1)?.clamp(1e-9f32, f32::MAX)?;
            summed.broadcast_div(&counts)
        };
        pool().map_err(|e| EmbeddingError::InferenceFailed(format!("Mean pooling failed: {}", e)))
    }

    /// Applies L2 normalization to create unit vectors.
    fn normalize_l2(v: &Tensor) -> Result<Tensor, EmbeddingError> {
        let norm = || -> candle_core::Result<Tensor> {
            v.broadcast_div(&v.sqr()?.sum_keepdim(1)?.sqrt()?)
        };
        norm().map_err(|e| EmbeddingError::InferenceFailed(format!("Failed to normalize: {}", e)))
    }
}

impl Embedder for BertEmbedder {
    fn embedding_dim(&self) -> usize {
        self.hidden_size
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_batch(&[text])?
            .pop()
            .ok_or_else(|| EmbeddingError::InferenceFailed("Model returned no rows".to_string()))
    }

    /// Embeds `texts` in chunks of `batch_size`, one padded forward pass per
    /// chunk.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        embed_in_batches(texts, self.config.batch_size, |chunk| {
            let batch = self.tokenizer.encode_batch(chunk)?;
            debug!(rows = batch.rows, width = batch.width, "Embedding batch");
            self.forward(&batch)
        })
    }
}

/// Runs `embed` over consecutive chunks of at most `batch_size` texts and
/// concatenates the rows in input order.
fn embed_in_batches<F>(
    texts: &[&str],
    batch_size: usize,
    mut embed: F,
) -> Result<Vec<Vec<f32>>, EmbeddingError>
where
    F: FnMut(&[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>,
{
    let mut embeddings = Vec::with_capacity(texts.len());
    for chunk in texts.chunks(batch_size.max(1)) {
        embeddings.extend(embed(chunk)?);
    }
    Ok(embeddings)
}
