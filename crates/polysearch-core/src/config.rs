//! Production configuration.
//!
//! Named constants for the ranking defaults plus [`SearchConfig`], the
//! serde-deserializable bundle the engine is built with. The constants are
//! the reference deployment's values; they are defaults, not derived
//! quantities.
//!
//! # Usage
//!
//! ```
//! use polysearch_core::config::{SearchConfig, DEFAULT_MAX_RESULTS};
//!
//! let config = SearchConfig::default();
//! assert_eq!(config.max_results, DEFAULT_MAX_RESULTS);
//! assert!(config.validate().is_ok());
//! ```

use crate::language::Language;
use crate::search::SearchError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// =============================================================================
// Ranking
// =============================================================================

/// Fused scores strictly below this value are dropped.
pub const DEFAULT_RELEVANCE_THRESHOLD: f32 = 0.2;

/// Fusion weight for the corpus in the query's own language.
pub const DEFAULT_SAME_LANGUAGE_WEIGHT: f32 = 0.6;

/// Fusion weight for every other corpus (pure semantic).
pub const DEFAULT_CROSS_LANGUAGE_WEIGHT: f32 = 1.0;

/// Maximum number of merged results returned by a search.
pub const DEFAULT_MAX_RESULTS: usize = 12;

// =============================================================================
// BM25 (Okapi)
// =============================================================================

/// Term-frequency saturation constant.
pub const BM25_K1: f32 = 1.5;

/// Document-length normalization constant.
pub const BM25_B: f32 = 0.75;

/// Floor factor for terms with negative IDF (fraction of the average IDF).
pub const BM25_EPSILON: f32 = 0.25;

// =============================================================================
// Embedding
// =============================================================================

/// Output dimension of the feature-hashing embedder.
pub const DEFAULT_HASHING_DIM: usize = 256;

/// BM25 tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bm25Params {
    /// Term-frequency saturation
    pub k1: f32,
    /// Length normalization
    pub b: f32,
    /// Negative-IDF floor factor
    pub epsilon: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self {
            k1: BM25_K1,
            b: BM25_B,
            epsilon: BM25_EPSILON,
        }
    }
}

/// Engine configuration.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use polysearch_core::config::SearchConfig;
///
/// let config: SearchConfig = serde_json::from_str(r#"{"max_results": 5}"#).unwrap();
/// assert_eq!(config.max_results, 5);
/// assert_eq!(config.relevance_threshold, 0.2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Supported languages in merge order. The first one is the fallback
    /// primary language.
    pub languages: Vec<Language>,
    /// Minimum fused score for a document to be returned
    pub relevance_threshold: f32,
    /// Fusion weight for the primary language's corpus
    pub same_language_weight: f32,
    /// Fusion weight for the other corpora
    pub cross_language_weight: f32,
    /// Cap on merged results
    pub max_results: usize,
    /// BM25 tunables
    pub bm25: Bm25Params,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            languages: Language::ALL.to_vec(),
            relevance_threshold: DEFAULT_RELEVANCE_THRESHOLD,
            same_language_weight: DEFAULT_SAME_LANGUAGE_WEIGHT,
            cross_language_weight: DEFAULT_CROSS_LANGUAGE_WEIGHT,
            max_results: DEFAULT_MAX_RESULTS,
            bm25: Bm25Params::default(),
        }
    }
}

impl SearchConfig {
    /// Returns the fallback primary language (first configured).
    pub fn default_language(&self) -> Option<Language> {
        self.languages.first().copied()
    }

    /// Checks ranges and the language list.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.languages.is_empty() {
            return Err(SearchError::InvalidConfig(
                "at least one language must be configured".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for language in &self.languages {
            if !seen.insert(*language) {
                return Err(SearchError::InvalidConfig(format!(
                    "language '{}' is configured twice",
                    language.code()
                )));
            }
        }

        check_unit_interval("relevance_threshold", self.relevance_threshold)?;
        check_unit_interval("same_language_weight", self.same_language_weight)?;
        check_unit_interval("cross_language_weight", self.cross_language_weight)?;
        check_unit_interval("bm25.b", self.bm25.b)?;

        if self.bm25.k1.is_nan() || self.bm25.k1 <= 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "bm25.k1 must be positive, got {}",
                self.bm25.k1
            )));
        }
        if self.bm25.epsilon.is_nan() || self.bm25.epsilon < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "bm25.epsilon must be non-negative, got {}",
                self.bm25.epsilon
            )));
        }

        Ok(())
    }
}

fn check_unit_interval(name: &str, value: f32) -> Result<(), SearchError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SearchError::InvalidConfig(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )))
    }
}
