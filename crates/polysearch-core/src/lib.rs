//! # Polysearch Core
//!
//! Multilingual hybrid retrieval: BM25 lexical matching and dense semantic
//! similarity, fused into one relevance score per document and merged across
//! language-partitioned corpora.
//!
//! This crate holds the engine and its traits; the `polysearch` binary in
//! `polysearch-cli` is a thin boundary over it.
//!
//! ## Modules
//!
//! - [`search`] - Lexical/semantic indices, fusion ranker, query router, engine snapshots
//! - [`text`] - Per-language tokenization, stopwords and stemming
//! - [`language`] - Supported languages and their lexical resources
//! - [`embedding`] - Embedder trait, feature-hashing and Candle BERT implementations
//! - [`storage`] - Corpus loaders (in-memory, JSON directory)
//! - [`config`] - Ranking defaults and validated engine configuration
//! - [`metrics`] - Build and search timings with rolling averages
//! - [`error`] - Embedding error type

pub mod config;
pub mod embedding;
pub mod error;
pub mod language;
pub mod metrics;
pub mod search;
pub mod storage;
pub mod text;
