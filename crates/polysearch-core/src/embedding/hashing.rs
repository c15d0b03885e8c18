//! Deterministic feature-hashing embedder.
//!
//! Maps character trigrams of the lowercased text into a fixed number of
//! buckets with xxh3 and L2-normalizes the counts. Texts that share
//! substrings land close together under cosine similarity, which is enough
//! for offline use and for exercising the ranking pipeline in tests without
//! model weights. It carries no cross-lingual semantics.

use super::traits::Embedder;
use crate::config::DEFAULT_HASHING_DIM;
use crate::error::EmbeddingError;
use xxhash_rust::xxh3::xxh3_64;

/// Character n-gram width.
const NGRAM: usize = 3;

/// Bag-of-trigrams embedder with a fixed output dimension.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    /// Creates an embedder producing vectors of `dim` entries.
    ///
    /// A `dim` of 0 is bumped to 1 so every vector has a slot.
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    fn bucket(&self, gram: &str) -> usize {
        (xxh3_64(gram.as_bytes()) % self.dim as u64) as usize
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_HASHING_DIM)
    }
}

impl Embedder for HashingEmbedder {
    fn embedding_dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vector = vec![0.0f32; self.dim];

        for word in text.to_lowercase().split_whitespace() {
            // Pad so word boundaries become features
            let chars: Vec<char> = std::iter::once(' ')
                .chain(word.chars())
                .chain(std::iter::once(' '))
                .collect();

            if chars.len() <= NGRAM {
                let gram: String = chars.iter().collect();
                vector[self.bucket(&gram)] += 1.0;
                continue;
            }

            for window in chars.windows(NGRAM) {
                let gram: String = window.iter().collect();
                vector[self.bucket(&gram)] += 1.0;
            }
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::vector::cosine_similarity;

    #[test]
    fn test_dimension_and_unit_norm() {
        let embedder = HashingEmbedder::new(128);
        let vector = embedder.embed("Electric cars are efficient").unwrap();
        assert_eq!(vector.len(), 128);
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_deterministic() {
        let a = HashingEmbedder::default().embed("stock markets").unwrap();
        let b = HashingEmbedder::default().embed("stock markets").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), DEFAULT_HASHING_DIM);
    }

    #[test]
    fn test_case_insensitive() {
        let embedder = HashingEmbedder::default();
        assert_eq!(
            embedder.embed("Electric").unwrap(),
            embedder.embed("electric").unwrap()
        );
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let vector = HashingEmbedder::new(16).embed("   ").unwrap();
        assert_eq!(vector, vec![0.0; 16]);
    }

    #[test]
    fn test_shared_substrings_are_closer() {
        let embedder = HashingEmbedder::default();
        let query = embedder.embed("electric vehicle").unwrap();
        let related = embedder.embed("Electric cars are efficient").unwrap();
        let unrelated = embedder.embed("Stock markets fluctuate").unwrap();
        assert!(cosine_similarity(&query, &related) > cosine_similarity(&query, &unrelated));
    }

    #[test]
    fn test_handles_devanagari_and_short_words() {
        let embedder = HashingEmbedder::new(32);
        let vector = embedder.embed("भारत a").unwrap();
        assert_eq!(vector.len(), 32);
        assert!(vector.iter().any(|&x| x > 0.0));
    }

    #[test]
    fn test_batch_matches_single() {
        let embedder = HashingEmbedder::new(64);
        let batch = embedder.embed_batch(&["one", "two"]).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1], embedder.embed("two").unwrap());
    }

    #[test]
    fn test_zero_dim_is_clamped() {
        assert_eq!(HashingEmbedder::new(0).embedding_dim(), 1);
    }
}
