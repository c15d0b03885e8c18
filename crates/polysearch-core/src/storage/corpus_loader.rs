//! Corpus loader trait and in-memory implementation.
//!
//! The engine consumes one static snapshot per language. Where that snapshot
//! comes from (a JSON export, a database dump, a test fixture) is hidden
//! behind [`CorpusLoader`].

use crate::language::Language;
use crate::search::Document;
use std::collections::HashMap;
use thiserror::Error;

/// Title given to documents that have none.
pub const DEFAULT_TITLE: &str = "No Title";
/// URL given to documents that have none.
pub const DEFAULT_URL: &str = "#";

/// Errors that can occur while loading a corpus.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error (filesystem)
    #[error("I/O error: {0}")]
    IoError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Source of per-language documents and, optionally, precomputed vectors.
///
/// Called once per language when an engine is built; never at query time.
#[async_trait::async_trait]
pub trait CorpusLoader: Send + Sync {
    /// Returns every document of `language`'s corpus in a stable order.
    ///
    /// A language with no data is an empty corpus, not an error.
    async fn load_corpus(&self, language: Language) -> Result<Vec<Document>, StoreError>;

    /// Returns precomputed embeddings aligned with [`load_corpus`](Self::load_corpus).
    ///
    /// `Ok(None)` means the engine embeds every document itself.
    async fn load_embeddings(
        &self,
        _language: Language,
    ) -> Result<Option<Vec<Vec<f32>>>, StoreError> {
        Ok(None)
    }
}

/// Loader over documents already held in memory.
///
/// Used by tests and by callers that assemble corpora themselves.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpusLoader {
    corpora: HashMap<Language, Vec<Document>>,
    embeddings: HashMap<Language, Vec<Vec<f32>>>,
}

impl InMemoryCorpusLoader {
    /// Creates a loader with no corpora.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds documents to `language`'s corpus.
    ///
    /// Each document's `language` is set to `language`.
    pub fn with_documents(mut self, language: Language, documents: Vec<Document>) -> Self {
        let corpus = self.corpora.entry(language).or_default();
        corpus.extend(documents.into_iter().map(|mut doc| {
            doc.language = language;
            doc
        }));
        self
    }

    /// Adds plain texts as documents with default title and URL and the
    /// position in the corpus as id.
    pub fn with_texts(mut self, language: Language, texts: &[&str]) -> Self {
        let corpus = self.corpora.entry(language).or_default();
        let offset = corpus.len();
        corpus.extend(texts.iter().enumerate().map(|(i, text)| Document {
            id: (offset + i).to_string(),
            title: DEFAULT_TITLE.to_string(),
            text: text.to_string(),
            url: DEFAULT_URL.to_string(),
            language,
        }));
        self
    }

    /// Supplies precomputed embeddings for `language`.
    pub fn with_embeddings(mut self, language: Language, embeddings: Vec<Vec<f32>>) -> Self {
        self.embeddings.insert(language, embeddings);
        self
    }
}

#[async_trait::async_trait]
impl CorpusLoader for InMemoryCorpusLoader {
    async fn load_corpus(&self, language: Language) -> Result<Vec<Document>, StoreError> {
        Ok(self.corpora.get(&language).cloned().unwrap_or_default())
    }

    async fn load_embeddings(
        &self,
        language: Language,
    ) -> Result<Option<Vec<Vec<f32>>>, StoreError> {
        Ok(self.embeddings.get(&language).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_language_is_empty() {
        let loader = InMemoryCorpusLoader::new();
        assert!(loader.load_corpus(Language::Hindi).await.unwrap().is_empty());
        assert!(loader
            .load_embeddings(Language::Hindi)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_with_texts_applies_defaults() {
        let loader = InMemoryCorpusLoader::new()
            .with_texts(Language::Spanish, &["uno", "dos"])
            .with_texts(Language::Spanish, &["tres"]);

        let docs = loader.load_corpus(Language::Spanish).await.unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[2].id, "2");
        assert_eq!(docs[2].text, "tres");
        assert_eq!(docs[0].title, DEFAULT_TITLE);
        assert_eq!(docs[0].url, DEFAULT_URL);
        assert!(docs.iter().all(|d| d.language == Language::Spanish));
    }

    #[tokio::test]
    async fn test_with_documents_retags_language() {
        let doc = Document {
            id: "a".to_string(),
            title: "T".to_string(),
            text: "text".to_string(),
            url: "https://example.com".to_string(),
            language: Language::English,
        };
        let loader = InMemoryCorpusLoader::new().with_documents(Language::Hindi, vec![doc]);
        let docs = loader.load_corpus(Language::Hindi).await.unwrap();
        assert_eq!(docs[0].language, Language::Hindi);
        assert!(loader.load_corpus(Language::English).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_embeddings_round_trip() {
        let loader = InMemoryCorpusLoader::new()
            .with_texts(Language::English, &["a"])
            .with_embeddings(Language::English, vec![vec![1.0, 0.0]]);
        let embeddings = loader.load_embeddings(Language::English).await.unwrap();
        assert_eq!(embeddings, Some(vec![vec![1.0, 0.0]]));
    }
}
