//! Multilingual hybrid search.
//!
//! Every supported language has its own corpus with two indices:
//! - **Lexical** (`keyword`): BM25 Okapi over normalized, stemmed tokens
//! - **Semantic** (`vector`): exhaustive cosine similarity over embeddings
//!
//! A query is scored against every document of every corpus. Within each
//! corpus both score vectors are min-max normalized (`normalize`), fused with
//! a language-dependent weight and thresholded (`fusion`). The engine then
//! merges all languages into one list.
//!
//! # Architecture
//!
//! - `types`: Document, RankedResult, SearchResponse, SearchError
//! - `keyword`: BM25 lexical index
//! - `vector`: dense vector index
//! - `normalize`: min-max score normalization
//! - `fusion`: weighted fusion and thresholding
//! - `corpus`: one language's documents plus both indices
//! - `engine`: SearchEngine (parallel build, routing, merge)
//! - `snapshot`: EngineHandle for atomic engine swaps
//!
//! # Usage
//!
//! ```
//! use polysearch_core::config::SearchConfig;
//! use polysearch_core::embedding::HashingEmbedder;
//! use polysearch_core::language::Language;
//! use polysearch_core::search::SearchEngine;
//! use polysearch_core::storage::InMemoryCorpusLoader;
//! use std::sync::Arc;
//!
//! # let runtime = tokio::runtime::Runtime::new().unwrap();
//! # runtime.block_on(async {
//! let loader = InMemoryCorpusLoader::new()
//!     .with_texts(Language::English, &["Electric cars are efficient", "Stock markets fluctuate"]);
//! let config = SearchConfig { languages: vec![Language::English], ..SearchConfig::default() };
//!
//! let engine = SearchEngine::build(&loader, Arc::new(HashingEmbedder::default()), config)
//!     .await
//!     .unwrap();
//! let response = engine.search("electric vehicle", Some(Language::English), 12).unwrap();
//! assert_eq!(response.results[0].text, "Electric cars are efficient");
//! # });
//! ```
//!
//! # Scores
//!
//! Normalization is strictly per corpus. A `fused_score` of 0.9 from the
//! Spanish corpus and 0.9 from the English corpus are each relative to their
//! own corpus's best and worst documents for that query.

pub mod types;

mod corpus;
mod engine;
mod snapshot;

// Exposed for benchmarking
#[doc(hidden)]
pub mod fusion;
#[doc(hidden)]
pub mod keyword;
#[doc(hidden)]
pub mod normalize;
#[doc(hidden)]
pub mod vector;

pub use corpus::Corpus;
pub use engine::SearchEngine;
pub use snapshot::EngineHandle;
pub use types::{
    validate_dimension, CorpusStats, Document, LanguageFailure, RankedResult, ScoreVector,
    SearchError, SearchResponse,
};
