//! Search command implementation.
//!
//! Loads the corpora, builds the engine and runs a single query.

use crate::config;
use anyhow::{Context, Result};
use polysearch_core::embedding::Embedder;
use polysearch_core::language::Language;
use polysearch_core::search::{SearchEngine, SearchError, SearchResponse};
use polysearch_core::storage::JsonDirectoryLoader;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Everything one CLI invocation needs to run a search.
#[derive(Debug, Default)]
pub struct SearchOptions {
    pub query: String,
    /// Overrides the configured `max_results`
    pub limit: Option<usize>,
    /// Caller-detected language code
    pub language: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub model_dir: Option<PathBuf>,
}

/// Performs a search over the corpora in the data directory.
///
/// This function:
/// 1. Resolves the data directory and engine configuration
/// 2. Loads the embedder
/// 3. Builds one corpus per configured language
/// 4. Runs the query with the caller-detected language
///
/// A blank query fails with [`SearchError::EmptyQuery`] before anything is
/// loaded.
pub async fn execute_search(options: &SearchOptions) -> Result<SearchResponse> {
    if options.query.trim().is_empty() {
        return Err(SearchError::EmptyQuery.into());
    }

    // 1. Paths and config
    let data_dir = config::get_data_dir(options.data_dir.as_ref())?;
    let search_config = config::load_search_config(options.config_path.as_deref())?;
    let limit = options.limit.unwrap_or(search_config.max_results);
    let detected = resolve_language(options.language.as_deref());

    // 2. Embedder
    let embedder = load_embedder(options.model_dir.as_ref(), &data_dir)?;
    info!("Using embedder with dimension {}", embedder.embedding_dim());

    // 3. Engine
    info!("Loading corpora from {}", data_dir.display());
    let loader = JsonDirectoryLoader::new(&data_dir);
    let engine = SearchEngine::build(&loader, embedder, search_config)
        .await
        .with_context(|| format!("Failed to build search engine from {}", data_dir.display()))?;

    for failure in engine.unavailable() {
        warn!("Corpus '{}' unavailable: {}", failure.language, failure.reason);
    }

    // 4. Search
    info!("Searching for: \"{}\"", options.query);
    let response = engine.search(&options.query, detected, limit)?;
    info!(
        "Found {} results (primary language: {})",
        response.results.len(),
        response.primary_language
    );
    Ok(response)
}

/// Maps a `--lang` value to a supported language; anything else is undetected.
fn resolve_language(code: Option<&str>) -> Option<Language> {
    let code = code?;
    let language = Language::from_code(code);
    if language.is_none() {
        info!("Language '{}' is not supported; treating as undetected", code);
    }
    language
}

#[cfg(feature = "model")]
fn load_embedder(
    model_dir: Option<&PathBuf>,
    data_dir: &std::path::Path,
) -> Result<Arc<dyn Embedder>> {
    use anyhow::anyhow;
    use polysearch_core::embedding::{BertEmbedder, SentenceModelConfig};

    let dir = config::get_model_dir(model_dir, data_dir);
    info!("Loading sentence embedding model from {}", dir.display());
    let embedder = BertEmbedder::from_dir(&dir, SentenceModelConfig::default())
        .map_err(|e| {
            anyhow!(
                "Failed to load embedding model from {}: {}",
                dir.display(),
                e
            )
        })?;
    Ok(Arc::new(embedder))
}

#[cfg(not(feature = "model"))]
fn load_embedder(
    model_dir: Option<&PathBuf>,
    _data_dir: &std::path::Path,
) -> Result<Arc<dyn Embedder>> {
    use polysearch_core::embedding::HashingEmbedder;

    if let Some(dir) = model_dir {
        warn!(
            "Ignoring model directory {} (built without the `model` feature)",
            dir.display()
        );
    }
    warn!("Using the hashing embedder; cross-lingual matching is limited to shared n-grams");
    Ok(Arc::new(HashingEmbedder::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_docs(dir: &TempDir) {
        std::fs::write(
            dir.path().join("docs_en.json"),
            r#"[
                {"title": "EVs", "text": "Electric cars are efficient", "url": "https://en.example/ev"},
                {"title": "Finance", "text": "Stock markets fluctuate", "url": "https://en.example/fin"}
            ]"#,
        )
        .unwrap();
    }

    fn options(dir: &TempDir, query: &str) -> SearchOptions {
        SearchOptions {
            query: query.to_string(),
            data_dir: Some(dir.path().to_path_buf()),
            ..SearchOptions::default()
        }
    }

    #[tokio::test]
    async fn test_search_data_directory() {
        let dir = TempDir::new().unwrap();
        write_docs(&dir);

        let response = execute_search(&options(&dir, "electric vehicle")).await.unwrap();
        assert_eq!(response.primary_language, Language::English);
        assert_eq!(response.results[0].title, "EVs");
    }

    #[tokio::test]
    async fn test_empty_query_rejected_before_loading() {
        let options = SearchOptions {
            query: "   ".to_string(),
            data_dir: Some(PathBuf::from("/nonexistent/path")),
            ..SearchOptions::default()
        };
        let err = execute_search(&options).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SearchError>(),
            Some(SearchError::EmptyQuery)
        ));
    }

    #[tokio::test]
    async fn test_unknown_language_falls_back() {
        let dir = TempDir::new().unwrap();
        write_docs(&dir);

        let mut options = options(&dir, "electric vehicle");
        options.language = Some("fr".to_string());
        let response = execute_search(&options).await.unwrap();
        assert_eq!(response.primary_language, Language::English);
    }

    #[tokio::test]
    async fn test_limit_caps_results() {
        let dir = TempDir::new().unwrap();
        write_docs(&dir);

        let mut options = options(&dir, "electric vehicle");
        options.limit = Some(0);
        let response = execute_search(&options).await.unwrap();
        assert!(response.results.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_corpus_reports_context() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("docs_hi.json"), "not json").unwrap();

        let err = execute_search(&options(&dir, "query")).await.unwrap_err();
        assert!(err.to_string().contains("Failed to build search engine"));
    }

    #[test]
    fn test_resolve_language() {
        assert_eq!(resolve_language(Some("es")), Some(Language::Spanish));
        assert_eq!(resolve_language(Some("hi-IN")), Some(Language::Hindi));
        assert_eq!(resolve_language(Some("fr")), None);
        assert_eq!(resolve_language(None), None);
    }
}
