//! JSON directory corpus loader.
//!
//! Layout, one pair of files per language code:
//!
//! ```text
//! <dir>/docs_en.json        [{"id": 1, "title": "...", "text": "...", "url": "..."}, ...]
//! <dir>/embeddings_en.json  [[0.12, -0.3, ...], ...]   (optional)
//! ```
//!
//! Every document field is optional. Missing ids become the document's
//! position, missing titles `"No Title"`, missing URLs `"#"`, missing text the
//! empty string.

use super::corpus_loader::{CorpusLoader, StoreError, DEFAULT_TITLE, DEFAULT_URL};
use crate::language::Language;
use crate::search::Document;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One entry of a `docs_<code>.json` file.
#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl RawDocument {
    fn into_document(self, position: usize, language: Language) -> Document {
        let id = match self.id {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Null) | None => position.to_string(),
            Some(other) => other.to_string(),
        };

        Document {
            id,
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            text: self.text.unwrap_or_default(),
            url: self.url.unwrap_or_else(|| DEFAULT_URL.to_string()),
            language,
        }
    }
}

/// Loads corpora from `docs_<code>.json` files in a directory.
#[derive(Debug, Clone)]
pub struct JsonDirectoryLoader {
    root: PathBuf,
}

impl JsonDirectoryLoader {
    /// Creates a loader reading from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory this loader reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `language`'s documents file.
    pub fn documents_path(&self, language: Language) -> PathBuf {
        self.root.join(format!("docs_{}.json", language.code()))
    }

    /// Path of `language`'s optional embeddings file.
    pub fn embeddings_path(&self, language: Language) -> PathBuf {
        self.root
            .join(format!("embeddings_{}.json", language.code()))
    }

    /// Reads a file, mapping "not found" to `None`.
    async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::IoError(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[async_trait::async_trait]
impl CorpusLoader for JsonDirectoryLoader {
    async fn load_corpus(&self, language: Language) -> Result<Vec<Document>, StoreError> {
        let path = self.documents_path(language);
        let Some(bytes) = Self::read_optional(&path).await? else {
            info!("No documents file for '{}' at {}", language, path.display());
            return Ok(Vec::new());
        };

        let raw: Vec<RawDocument> = serde_json::from_slice(&bytes).map_err(|e| {
            StoreError::SerializationError(format!("{}: {}", path.display(), e))
        })?;

        debug!("Loaded {} '{}' documents from {}", raw.len(), language, path.display());

        Ok(raw
            .into_iter()
            .enumerate()
            .map(|(position, doc)| doc.into_document(position, language))
            .collect())
    }

    async fn load_embeddings(
        &self,
        language: Language,
    ) -> Result<Option<Vec<Vec<f32>>>, StoreError> {
        let path = self.embeddings_path(language);
        let Some(bytes) = Self::read_optional(&path).await? else {
            return Ok(None);
        };

        let embeddings: Vec<Vec<f32>> = serde_json::from_slice(&bytes).map_err(|e| {
            StoreError::SerializationError(format!("{}: {}", path.display(), e))
        })?;

        debug!(
            "Loaded {} precomputed '{}' embeddings",
            embeddings.len(),
            language
        );
        Ok(Some(embeddings))
    }
}
