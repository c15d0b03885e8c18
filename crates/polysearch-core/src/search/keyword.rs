//! BM25 lexical index for one language corpus.
//!
//! # Algorithm
//!
//! BM25 Okapi over normalized tokens:
//!
//! - **IDF**: `ln(N - df + 0.5) - ln(df + 0.5)`. Terms that appear in more
//!   than half the corpus get a negative value, which is replaced by
//!   `epsilon * average_idf`.
//! - **TF saturation**: `tf * (k1 + 1) / (tf + k1 * (1 - b + b * dl / avgdl))`
//! - **Score**: sum over query tokens (duplicates count each time)
//!
//! Unlike a top-k keyword engine, [`LexicalIndex::score`] returns a score for
//! every document in corpus order. Non-matching documents score exactly 0 and
//! keep their slot so the vector lines up with the semantic index.

use super::types::ScoreVector;
use crate::config::Bm25Params;
use crate::text::TextNormalizer;
use std::collections::HashMap;
use tracing::instrument;

/// A (document position, term frequency) pair.
#[derive(Debug, Clone, Copy)]
struct Posting {
    doc: usize,
    term_frequency: u32,
}

/// Inverted index with BM25 statistics, built once per corpus.
///
/// Read-only after construction; `score` takes `&self` and is safe to call
/// from many threads at once.
#[derive(Debug)]
pub struct LexicalIndex {
    normalizer: TextNormalizer,
    params: Bm25Params,
    postings: HashMap<String, Vec<Posting>>,
    idf: HashMap<String, f32>,
    doc_lengths: Vec<u32>,
    average_doc_length: f32,
}

impl LexicalIndex {
    /// Builds the index from raw document texts.
    ///
    /// Every text goes through `normalizer`, which the index keeps for
    /// queries.
    #[instrument(skip_all, fields(language = %normalizer.language(), docs = texts.len()))]
    pub fn build<S: AsRef<str>>(
        normalizer: TextNormalizer,
        params: Bm25Params,
        texts: &[S],
    ) -> Self {
        let mut postings: HashMap<String, Vec<Posting>> = HashMap::new();
        let mut doc_lengths = Vec::with_capacity(texts.len());

        for (doc, text) in texts.iter().enumerate() {
            let tokens = normalizer.normalize(text.as_ref());
            doc_lengths.push(tokens.len() as u32);

            let mut frequencies: HashMap<String, u32> = HashMap::new();
            for token in tokens {
                *frequencies.entry(token).or_insert(0) += 1;
            }
            for (term, term_frequency) in frequencies {
                postings.entry(term).or_default().push(Posting {
                    doc,
                    term_frequency,
                });
            }
        }

        // Keep postings in document order so scoring walks memory linearly
        for list in postings.values_mut() {
            list.sort_unstable_by_key(|p| p.doc);
        }

        let total_length: u64 = doc_lengths.iter().map(|&l| l as u64).sum();
        let average_doc_length = if doc_lengths.is_empty() {
            0.0
        } else {
            total_length as f32 / doc_lengths.len() as f32
        };

        let idf = compute_idf(&postings, doc_lengths.len(), params.epsilon);

        Self {
            normalizer,
            params,
            postings,
            idf,
            doc_lengths,
            average_doc_length,
        }
    }

    /// Normalizes `query` with the index's own pipeline.
    pub fn tokenize_query(&self, query: &str) -> Vec<String> {
        self.normalizer.normalize(query)
    }

    /// Scores normalized query tokens against every document.
    ///
    /// The result has exactly [`len`](Self::len) entries.
    pub fn score(&self, query_tokens: &[String]) -> ScoreVector {
        let mut scores = vec![0.0f32; self.doc_lengths.len()];
        if self.doc_lengths.is_empty() || self.average_doc_length == 0.0 {
            return scores;
        }

        let k1 = self.params.k1;
        let b = self.params.b;

        for token in query_tokens {
            let (Some(list), Some(&idf)) = (self.postings.get(token), self.idf.get(token)) else {
                continue;
            };

            for posting in list {
                let tf = posting.term_frequency as f32;
                let dl = self.doc_lengths[posting.doc] as f32;
                let norm = 1.0 - b + b * dl / self.average_doc_length;
                scores[posting.doc] += idf * (tf * (k1 + 1.0)) / (tf + k1 * norm);
            }
        }

        scores
    }

    /// Normalizes `query` and scores it.
    pub fn score_text(&self, query: &str) -> ScoreVector {
        self.score(&self.tokenize_query(query))
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.doc_lengths.len()
    }

    /// Returns `true` if no documents are indexed.
    pub fn is_empty(&self) -> bool {
        self.doc_lengths.is_empty()
    }

    /// Number of distinct terms.
    pub fn vocabulary_size(&self) -> usize {
        self.postings.len()
    }

    /// Mean document length in tokens.
    pub fn average_doc_length(&self) -> f32 {
        self.average_doc_length
    }

    /// IDF of a normalized term, if it occurs in the corpus.
    pub fn idf(&self, term: &str) -> Option<f32> {
        self.idf.get(term).copied()
    }
}

/// Okapi IDF with the negative-value floor.
fn compute_idf(
    postings: &HashMap<String, Vec<Posting>>,
    doc_count: usize,
    epsilon: f32,
) -> HashMap<String, f32> {
    let n = doc_count as f32;
    let mut idf = HashMap::with_capacity(postings.len());
    let mut idf_sum = 0.0f32;
    let mut negative = Vec::new();

    for (term, list) in postings {
        let df = list.len() as f32;
        let value = (n - df + 0.5).ln() - (df + 0.5).ln();
        idf_sum += value;
        if value < 0.0 {
            negative.push(term.clone());
        }
        idf.insert(term.clone(), value);
    }

    if !idf.is_empty() {
        let floor = epsilon * (idf_sum / idf.len() as f32);
        for term in negative {
            idf.insert(term, floor);
        }
    }

    idf
}
