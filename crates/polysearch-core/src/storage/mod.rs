//! Corpus loading.
//!
//! # Implementations
//!
//! - [`InMemoryCorpusLoader`] - documents assembled in code (tests, embedding callers)
//! - [`JsonDirectoryLoader`] - `docs_<code>.json` / `embeddings_<code>.json` files

mod corpus_loader;
mod json_store;

pub use corpus_loader::{
    CorpusLoader, InMemoryCorpusLoader, StoreError, DEFAULT_TITLE, DEFAULT_URL,
};
pub use json_store::JsonDirectoryLoader;
