//! Weighted linear fusion of normalized semantic and lexical scores.
//!
//! Both inputs must already be min-max normalized per corpus (see
//! [`min_max_normalize`](super::normalize::min_max_normalize)); fusion is a
//! plain convex combination followed by a relevance threshold.

use super::types::{Document, RankedResult, ScoreVector, SearchError};

/// Combines two aligned score vectors: `weight * semantic + (1 - weight) * lexical`.
///
/// Weight 1.0 is pure semantic, 0.0 pure lexical.
///
/// # Errors
///
/// Returns `SearchError::ScoreLengthMismatch` if the vectors differ in length.
pub fn fuse_scores(
    semantic: &[f32],
    lexical: &[f32],
    weight: f32,
) -> Result<ScoreVector, SearchError> {
    if semantic.len() != lexical.len() {
        return Err(SearchError::ScoreLengthMismatch {
            expected: semantic.len(),
            actual: lexical.len(),
        });
    }

    Ok(semantic
        .iter()
        .zip(lexical.iter())
        .map(|(&sem, &lex)| weight * sem + (1.0 - weight) * lex)
        .collect())
}

/// Fuses, thresholds and materializes results for one corpus.
///
/// Documents whose fused score is strictly below `threshold` are dropped.
/// Survivors are emitted in document order and are not truncated; global
/// ordering and the result cap belong to the router.
///
/// # Errors
///
/// Returns `SearchError::ScoreLengthMismatch` if either score vector does not
/// have one entry per document.
pub fn rank(
    documents: &[Document],
    semantic: &[f32],
    lexical: &[f32],
    weight: f32,
    threshold: f32,
) -> Result<Vec<RankedResult>, SearchError> {
    for scores in [semantic, lexical] {
        if scores.len() != documents.len() {
            return Err(SearchError::ScoreLengthMismatch {
                expected: documents.len(),
                actual: scores.len(),
            });
        }
    }

    let fused = fuse_scores(semantic, lexical, weight)?;

    let results = documents
        .iter()
        .zip(fused)
        .enumerate()
        .filter(|(_, (_, score))| *score >= threshold)
        .map(|(i, (doc, fused_score))| RankedResult {
            language: doc.language,
            title: doc.title.clone(),
            text: doc.text.clone(),
            url: doc.url.clone(),
            fused_score,
            semantic_score: semantic[i],
            bm25_score: lexical[i],
        })
        .collect();

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    fn docs(n: usize) -> Vec<Document> {
        (0..n)
            .map(|i| Document {
                id: i.to_string(),
                title: format!("Doc {}", i),
                text: format!("text {}", i),
                url: format!("https://example.com/{}", i),
                language: Language::English,
            })
            .collect()
    }

    #[test]
    fn test_fuse_pure_weights() {
        let sem = [0.2, 0.9];
        let lex = [0.7, 0.1];
        assert_eq!(fuse_scores(&sem, &lex, 1.0).unwrap(), vec![0.2, 0.9]);
        assert_eq!(fuse_scores(&sem, &lex, 0.0).unwrap(), vec![0.7, 0.1]);
    }

    #[test]
    fn test_fuse_length_mismatch() {
        let result = fuse_scores(&[0.1, 0.2], &[0.3], 0.5);
        assert!(matches!(
            result,
            Err(SearchError::ScoreLengthMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    fn fused_at(sem: f32, lex: f32, weight: f32) -> f32 {
        fuse_scores(&[sem], &[lex], weight).unwrap()[0]
    }

    #[test]
    fn test_fused_score_rises_with_weight_when_semantic_dominates() {
        let mut previous = f32::NEG_INFINITY;
        for step in 0..=10 {
            let fused = fused_at(0.9, 0.1, step as f32 / 10.0);
            assert!(fused > previous, "weight {} gave {}", step, fused);
            previous = fused;
        }
        assert!(fused_at(0.9, 0.1, 0.8) > fused_at(0.9, 0.1, 0.2));
    }

    #[test]
    fn test_fused_score_falls_with_weight_when_lexical_dominates() {
        let mut previous = f32::INFINITY;
        for step in 0..=10 {
            let fused = fused_at(0.1, 0.9, step as f32 / 10.0);
            assert!(fused < previous, "weight {} gave {}", step, fused);
            previous = fused;
        }
        assert!(fused_at(0.1, 0.9, 0.8) < fused_at(0.1, 0.9, 0.2));
    }

    #[test]
    fn test_fused_score_ignores_weight_when_scores_agree() {
        for step in 0..=10 {
            let fused = fused_at(0.4, 0.4, step as f32 / 10.0);
            assert!((fused - 0.4).abs() < 1e-6, "weight {} gave {}", step, fused);
        }
    }

    #[test]
    fn test_rank_applies_threshold() {
        let documents = docs(3);
        let sem = [1.0, 0.1, 0.0];
        let lex = [0.0, 0.2, 1.0];
        let results = rank(&documents, &sem, &lex, 0.6, 0.2).unwrap();

        // fused: 0.6, 0.14, 0.4
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Doc 0");
        assert_eq!(results[1].title, "Doc 2");
        for result in &results {
            assert!(result.fused_score >= 0.2);
        }
    }

    #[test]
    fn test_rank_keeps_document_order_and_constituents() {
        let documents = docs(2);
        let results = rank(&documents, &[0.5, 1.0], &[1.0, 0.0], 0.5, 0.2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Doc 0");
        assert_eq!(results[0].semantic_score, 0.5);
        assert_eq!(results[0].bm25_score, 1.0);
        assert!((results[0].fused_score - 0.75).abs() < 1e-6);
        assert_eq!(results[1].url, "https://example.com/1");
        assert_eq!(results[1].text, "text 1");
        assert_eq!(results[1].language, Language::English);
    }

    #[test]
    fn test_rank_score_exactly_at_threshold_is_kept() {
        let documents = docs(1);
        let results = rank(&documents, &[0.2], &[0.2], 0.5, 0.2).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_rank_rejects_misaligned_vectors() {
        let documents = docs(2);
        assert!(matches!(
            rank(&documents, &[0.5], &[0.5, 0.5], 0.5, 0.2),
            Err(SearchError::ScoreLengthMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert!(matches!(
            rank(&documents, &[0.5, 0.5], &[0.5, 0.5, 0.5], 0.5, 0.2),
            Err(SearchError::ScoreLengthMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_rank_empty_corpus() {
        assert!(rank(&[], &[], &[], 0.6, 0.2).unwrap().is_empty());
    }
}
