// Min-max score normalization

use super::types::ScoreVector;

/// Rescales `scores` linearly into [0, 1] with `(x - min) / (max - min)`.
///
/// - empty input gives empty output
/// - when `max == min` (one element, or all equal) every output is 0.0
///
/// Lexical and semantic vectors are normalized separately before fusion,
/// since BM25 and cosine similarity live on unrelated scales.
pub fn min_max_normalize(scores: &[f32]) -> ScoreVector {
    if scores.is_empty() {
        return Vec::new();
    }

    let (min, max) = scores
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &s| {
            (lo.min(s), hi.max(s))
        });

    let range = max - min;
    if range == 0.0 || !range.is_finite() {
        return vec![0.0; scores.len()];
    }

    scores
        .iter()
        .map(|&s| ((s - min) / range).clamp(0.0, 1.0))
        .collect()
}
