// SearchEngine - per-language hybrid ranking and cross-corpus merge


use super::corpus::Corpus;
use super::types::{CorpusStats, LanguageFailure, RankedResult, SearchError, SearchResponse};
use crate::config::{Bm25Params, SearchConfig};
use crate::embedding::{check_dimension, Embedder};
use crate::language::Language;
use crate::metrics::{elapsed_ms, SearchMetrics};
use crate::search::Document;
use crate::storage::CorpusLoader;
use instant::Instant;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Build outcome for one configured language.
#[derive(Debug)]
enum CorpusState {
    Ready(Corpus),
    /// Build failed; the corpus is never scored
    Unavailable(String),
}

#[derive(Debug)]
struct CorpusSlot {
    language: Language,
    state: CorpusState,
}

impl CorpusSlot {
    fn corpus(&self) -> Option<&Corpus> {
        match &self.state {
            CorpusState::Ready(corpus) => Some(corpus),
            CorpusState::Unavailable(_) => None,
        }
    }
}

/// Documents and optional precomputed vectors for one language.
type CorpusInput = (Language, Vec<Document>, Option<Vec<Vec<f32>>>);

/// Multilingual hybrid search engine.
///
/// Holds one [`Corpus`] per configured language, each with its own BM25 index
/// and vector index, plus the embedder used for queries. An engine is an
/// immutable snapshot: it is built once by [`build`](Self::build), queries
/// take `&self`, and a data refresh builds a new engine (see
/// [`EngineHandle`](super::EngineHandle) for swapping it in).
///
/// # Ranking
///
/// For each corpus the query gets a BM25 score vector and a cosine score
/// vector, each min-max normalized within that corpus, fused as
/// `w * semantic + (1 - w) * lexical` and thresholded. `w` is
/// `same_language_weight` for the query's primary language and
/// `cross_language_weight` for the others. Per-language results are
/// concatenated in configured order, stably sorted by fused score and
/// truncated.
pub struct SearchEngine {
    config: SearchConfig,
    embedder: Arc<dyn Embedder>,
    /// One slot per configured language, in configured order
    corpora: Vec<CorpusSlot>,
    metrics: SearchMetrics,
}

impl SearchEngine {
    /// Loads every configured language from `loader` and builds its indices.
    ///
    /// Corpora are built in parallel, one scoped thread per language, inside
    /// [`tokio::task::spawn_blocking`]; the runtime's async workers stay free
    /// while documents are embedded. A language whose build fails (embedder
    /// error or wrong dimension) is kept as unavailable and reported by every
    /// search; the others are served normally.
    ///
    /// # Errors
    ///
    /// - `SearchError::InvalidConfig` if `config` fails validation
    /// - `SearchError::Storage` if the loader fails
    /// - `SearchError::NoCorporaAvailable` if every corpus fails to build or
    ///   the build task is cancelled
    #[instrument(skip_all, fields(languages = config.languages.len()))]
    pub async fn build<L>(
        loader: &L,
        embedder: Arc<dyn Embedder>,
        config: SearchConfig,
    ) -> Result<Self, SearchError>
    where
        L: CorpusLoader + ?Sized,
    {
        config.validate()?;
        let start = Instant::now();

        let mut inputs: Vec<CorpusInput> = Vec::with_capacity(config.languages.len());
        for &language in &config.languages {
            let documents = loader
                .load_corpus(language)
                .await
                .map_err(|e| SearchError::Storage(format!("{}: {}", language, e)))?;
            let embeddings = loader
                .load_embeddings(language)
                .await
                .map_err(|e| SearchError::Storage(format!("{}: {}", language, e)))?;
            debug!("Loaded {} '{}' documents", documents.len(), language);
            inputs.push((language, documents, embeddings));
        }

        let metrics = SearchMetrics::new();
        let corpora = {
            let embedder = Arc::clone(&embedder);
            let metrics = metrics.clone();
            let params = config.bm25;
            tokio::task::spawn_blocking(move || {
                build_corpora(inputs, embedder.as_ref(), params, &metrics)
            })
            .await
            .map_err(|e| {
                warn!("Corpus build task failed: {}", e);
                SearchError::NoCorporaAvailable
            })?
        };

        if corpora.iter().all(|slot| slot.corpus().is_none()) {
            return Err(SearchError::NoCorporaAvailable);
        }

        let total_docs: usize = corpora
            .iter()
            .filter_map(CorpusSlot::corpus)
            .map(Corpus::len)
            .sum();
        info!(
            "Search engine ready: {} languages, {} documents in {:.1}ms",
            corpora.len(),
            total_docs,
            elapsed_ms(start)
        );

        Ok(Self {
            config,
            embedder,
            corpora,
            metrics,
        })
    }

    /// Ranks every corpus against `query` and merges the results.
    ///
    /// `detected` is the caller's language identification result. An absent
    /// or unconfigured language falls back to the first configured language.
    ///
    /// The query is embedded once and shared by all corpora. Corpora are then
    /// scored one after another on the calling thread, in configured order.
    /// Scoring is synchronous; async callers should run it on a blocking
    /// pool. A corpus that fails at query time is logged, listed in
    /// [`SearchResponse::failures`], and skipped; the rest still contribute.
    ///
    /// # Errors
    ///
    /// - `SearchError::EmptyQuery` for an empty or whitespace-only query
    /// - `SearchError::Embedding` / `SearchError::DimensionMismatch` if the
    ///   query itself cannot be embedded
    #[instrument(skip_all, fields(query_len = query.len(), max_results = max_results))]
    pub fn search(
        &self,
        query: &str,
        detected: Option<Language>,
        max_results: usize,
    ) -> Result<SearchResponse, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        let start = Instant::now();

        let primary_language = self.resolve_language(detected);

        let embed_start = Instant::now();
        let query_embedding = self.embedder.embed(query)?;
        check_dimension(self.embedder.as_ref(), &query_embedding)?;
        let embed_ms = elapsed_ms(embed_start);

        let threshold = self.config.relevance_threshold;
        let mut results: Vec<RankedResult> = Vec::new();
        let mut failures: Vec<LanguageFailure> = Vec::new();

        for slot in &self.corpora {
            let weight = self.weight_for(slot.language, primary_language);
            let outcome = match &slot.state {
                CorpusState::Ready(corpus) => {
                    corpus.rank_query(query, &query_embedding, weight, threshold)
                }
                CorpusState::Unavailable(reason) => Err(SearchError::CorpusUnavailable {
                    language: slot.language,
                    reason: reason.clone(),
                }),
            };

            match outcome {
                Ok(mut ranked) => {
                    debug!(
                        "'{}' (weight {:.2}): {} results above threshold",
                        slot.language,
                        weight,
                        ranked.len()
                    );
                    results.append(&mut ranked);
                }
                Err(e) => {
                    warn!("Skipping '{}' for this query: {}", slot.language, e);
                    failures.push(LanguageFailure {
                        language: slot.language,
                        reason: e.to_string(),
                    });
                }
            }
        }

        // Stable: equal scores keep language order, then document order
        results.sort_by(|a, b| b.fused_score.total_cmp(&a.fused_score));
        results.truncate(max_results);

        let total_ms = elapsed_ms(start);
        self.metrics.record_search(
            embed_ms,
            total_ms,
            results.len(),
            failures.len(),
            results.first().map(|r| r.fused_score),
        );
        debug!(
            "Search complete: {} results, primary '{}', {:.1}ms",
            results.len(),
            primary_language,
            total_ms
        );

        Ok(SearchResponse {
            primary_language,
            results,
            failures,
        })
    }

    /// Ranks with the configured `max_results`.
    pub fn search_default(
        &self,
        query: &str,
        detected: Option<Language>,
    ) -> Result<SearchResponse, SearchError> {
        self.search(query, detected, self.config.max_results)
    }

    /// Picks the primary language for a query.
    ///
    /// Returns `detected` when it is one of the configured languages,
    /// otherwise the first configured language.
    pub fn resolve_language(&self, detected: Option<Language>) -> Language {
        let fallback = self.corpora[0].language;
        match detected {
            Some(language) if self.supports(language) => language,
            Some(language) => {
                info!(
                    "Detected language '{}' is not supported, falling back to '{}'",
                    language, fallback
                );
                fallback
            }
            None => {
                info!("No query language detected, falling back to '{}'", fallback);
                fallback
            }
        }
    }

    /// Fusion weight for `target` when the query's primary language is
    /// `primary`.
    pub fn weight_for(&self, target: Language, primary: Language) -> f32 {
        if target == primary {
            self.config.same_language_weight
        } else {
            self.config.cross_language_weight
        }
    }

    /// Returns `true` if `language` is configured.
    pub fn supports(&self, language: Language) -> bool {
        self.corpora.iter().any(|slot| slot.language == language)
    }

    /// Configured languages in merge order.
    pub fn languages(&self) -> Vec<Language> {
        self.corpora.iter().map(|slot| slot.language).collect()
    }

    /// The built corpus for `language`, if it is configured and available.
    pub fn corpus(&self, language: Language) -> Option<&Corpus> {
        self.corpora
            .iter()
            .find(|slot| slot.language == language)
            .and_then(CorpusSlot::corpus)
    }

    /// Languages whose corpus failed to build, with the cause.
    pub fn unavailable(&self) -> Vec<LanguageFailure> {
        self.corpora
            .iter()
            .filter_map(|slot| match &slot.state {
                CorpusState::Unavailable(reason) => Some(LanguageFailure {
                    language: slot.language,
                    reason: reason.clone(),
                }),
                CorpusState::Ready(_) => None,
            })
            .collect()
    }

    /// Index statistics for every available corpus.
    pub fn stats(&self) -> Vec<CorpusStats> {
        self.corpora
            .iter()
            .filter_map(CorpusSlot::corpus)
            .map(Corpus::stats)
            .collect()
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The embedder used for queries.
    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// Timing metrics for this engine.
    pub fn metrics(&self) -> &SearchMetrics {
        &self.metrics
    }
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("languages", &self.languages())
            .field("embedding_dim", &self.embedder.embedding_dim())
            .field("unavailable", &self.unavailable())
            .finish()
    }
}

/// Builds every corpus on its own scoped thread.
///
/// Slots come back in input order regardless of which build finishes first.
fn build_corpora(
    inputs: Vec<CorpusInput>,
    embedder: &dyn Embedder,
    params: Bm25Params,
    metrics: &SearchMetrics,
) -> Vec<CorpusSlot> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .into_iter()
            .map(|(language, documents, embeddings)| {
                let handle = scope.spawn(move || {
                    let start = Instant::now();
                    let built = Corpus::build(language, documents, embeddings, embedder, params);
                    metrics.record_index_build(elapsed_ms(start));
                    built
                });
                (language, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(language, handle)| {
                let state = match handle.join() {
                    Ok(Ok(corpus)) => CorpusState::Ready(corpus),
                    Ok(Err(e)) => {
                        warn!("Corpus '{}' unavailable: {}", language, e);
                        CorpusState::Unavailable(e.to_string())
                    }
                    Err(_) => {
                        warn!("Corpus '{}' build panicked", language);
                        CorpusState::Unavailable("corpus build panicked".to_string())
                    }
                };
                CorpusSlot { language, state }
            })
            .collect()
    })
}
