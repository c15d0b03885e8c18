//! Embedding model abstractions and implementations.
//!
//! ## Core Trait
//!
//! - [`Embedder`] - deterministic `text -> Vec<f32>` with a fixed dimension
//!
//! ## Implementations
//!
//! - [`HashingEmbedder`] - character-trigram feature hashing, no model files
//! - `BertEmbedder` - BERT sentence encoder on Candle (`candle` feature)
//! - `TokenizerHandle` - HuggingFace tokenizer wrapper (`candle` feature)
//!
//! ## Example
//!
//! ```ignore
//! use polysearch_core::embedding::{BertEmbedder, Embedder, SentenceModelConfig};
//!
//! let embedder = BertEmbedder::from_dir("models/minilm", SentenceModelConfig::default())?;
//! let embedding = embedder.embed("Hello, world!")?;
//! ```

mod hashing;
mod traits;

#[cfg(feature = "candle")]
pub mod config;
#[cfg(feature = "candle")]
pub mod model;
#[cfg(feature = "candle")]
pub mod tokenizer;

pub use hashing::HashingEmbedder;
pub(crate) use traits::check_dimension;
pub use traits::Embedder;

#[cfg(feature = "candle")]
pub use config::{SentenceModelConfig, DEFAULT_BATCH_SIZE, DEFAULT_MODEL_ID};
#[cfg(feature = "candle")]
pub use model::BertEmbedder;
#[cfg(feature = "candle")]
pub use tokenizer::TokenizerHandle;
