//! Lexical text normalization.
//!
//! - [`TextNormalizer`] - per-language tokenize/stopword/stem pipeline
//! - [`normalize`] - one-shot convenience over a fresh normalizer

mod normalizer;
pub(crate) mod stopwords;

pub use normalizer::{normalize, TextNormalizer};
