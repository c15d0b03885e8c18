// Corpus - one language's documents with their lexical and semantic indices

use super::fusion;
use super::keyword::LexicalIndex;
use super::normalize::min_max_normalize;
use super::types::{CorpusStats, Document, RankedResult, ScoreVector, SearchError};
use super::vector::SemanticIndex;
use crate::config::Bm25Params;
use crate::embedding::{check_dimension, Embedder};
use crate::language::Language;
use crate::metrics::elapsed_ms;
use crate::text::TextNormalizer;
use instant::Instant;
use tracing::{debug, info, instrument};

/// A language-tagged document set plus the indices derived from it.
///
/// Immutable after [`build`](Self::build). Both indices hold exactly one
/// entry per document, in document order.
#[derive(Debug)]
pub struct Corpus {
    language: Language,
    documents: Vec<Document>,
    lexical: LexicalIndex,
    semantic: SemanticIndex,
}

impl Corpus {
    /// Tokenizes, embeds and indexes `documents`.
    ///
    /// When `precomputed` is given it must hold one vector per document with
    /// the embedder's dimension; otherwise every document text is embedded.
    ///
    /// # Errors
    ///
    /// - `SearchError::Embedding` if the embedder fails or returns the wrong
    ///   number of vectors
    /// - `SearchError::DimensionMismatch` if any vector has the wrong length
    #[instrument(skip_all, fields(language = %language, docs = documents.len()))]
    pub fn build(
        language: Language,
        documents: Vec<Document>,
        precomputed: Option<Vec<Vec<f32>>>,
        embedder: &dyn Embedder,
        params: Bm25Params,
    ) -> Result<Self, SearchError> {
        let start = Instant::now();

        let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();

        let embeddings = match precomputed {
            Some(embeddings) => {
                debug!("Using {} precomputed embeddings", embeddings.len());
                embeddings
            }
            None => embedder.embed_batch(&texts)?,
        };

        if embeddings.len() != documents.len() {
            return Err(SearchError::Embedding(format!(
                "{} embeddings for {} documents",
                embeddings.len(),
                documents.len()
            )));
        }
        for embedding in &embeddings {
            check_dimension(embedder, embedding)?;
        }

        let semantic = SemanticIndex::from_embeddings(embedder.embedding_dim(), embeddings)?;
        let lexical = LexicalIndex::build(TextNormalizer::new(language), params, &texts);

        info!(
            "Built '{}' corpus: {} documents, {} terms in {:.1}ms",
            language,
            documents.len(),
            lexical.vocabulary_size(),
            elapsed_ms(start)
        );

        Ok(Self {
            language,
            documents,
            lexical,
            semantic,
        })
    }

    /// Corpus language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Documents in index order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` if the corpus has no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Raw BM25 scores for `query`, normalized with this corpus's pipeline.
    pub fn lexical_scores(&self, query: &str) -> ScoreVector {
        self.lexical.score_text(query)
    }

    /// Raw cosine similarities for `query_embedding`.
    pub fn semantic_scores(&self, query_embedding: &[f32]) -> Result<ScoreVector, SearchError> {
        self.semantic.score(query_embedding)
    }

    /// Scores, normalizes, fuses and thresholds one query against this corpus.
    ///
    /// Results come back in document order.
    pub fn rank_query(
        &self,
        query: &str,
        query_embedding: &[f32],
        weight: f32,
        threshold: f32,
    ) -> Result<Vec<RankedResult>, SearchError> {
        if self.documents.is_empty() {
            return Ok(Vec::new());
        }

        let semantic = min_max_normalize(&self.semantic_scores(query_embedding)?);
        let lexical = min_max_normalize(&self.lexical_scores(query));

        fusion::rank(&self.documents, &semantic, &lexical, weight, threshold)
    }

    /// Index statistics.
    pub fn stats(&self) -> CorpusStats {
        CorpusStats {
            language: self.language,
            document_count: self.documents.len(),
            vocabulary_size: self.lexical.vocabulary_size(),
            average_document_length: self.lexical.average_doc_length(),
            embedding_dim: self.semantic.dimension(),
        }
    }
}
