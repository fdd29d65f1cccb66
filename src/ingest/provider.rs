//! Embedding providers.

use crate::errors::EmbedError;
use std::future::Future;
use xxhash_rust::xxh64::xxh64;

/// Source of embedding vectors for text.
///
/// Implementations must be cheap to share across tasks; the pipeline holds
/// one behind an `Arc` and calls `embed` from many tasks at once.
pub trait EmbeddingProvider: Send + Sync + 'static {
    /// Identifies the model; checkpoints from another model are not reused.
    fn model_id(&self) -> &str;

    /// Length of every vector this provider returns.
    fn dimensions(&self) -> usize;

    /// Embed one text.
    ///
    /// Return [`EmbedError::RateLimited`] when the caller should back off
    /// and retry.
    fn embed(&self, text: String) -> impl Future<Output = Result<Vec<f64>, EmbedError>> + Send;
}

/// Offline provider using feature hashing.
///
/// Lowercased word tokens and character trigrams are hashed with xxh64 into
/// `dimensions` buckets with a hash-derived sign, and the result is
/// L2-normalized. Texts sharing words or word fragments end up close, which
/// is enough for grouping short names without a model download.
///
/// ```
/// use densegroup::ingest::HashingEmbedder;
///
/// let embedder = HashingEmbedder::new(64);
/// let v = embedder.embed_text("Pipe Fitter");
/// assert_eq!(v.len(), 64);
/// ```
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
    model_id: String,
}

const TOKEN_SEED: u64 = 0x5eed_0001;
const TRIGRAM_SEED: u64 = 0x5eed_0003;
const TRIGRAM_WEIGHT: f64 = 0.5;

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        let dimensions = dimensions.max(1);
        Self {
            dimensions,
            model_id: format!("hashing-xxh64-{dimensions}"),
        }
    }

    /// Synchronous embedding of `text`.
    pub fn embed_text(&self, text: &str) -> Vec<f64> {
        let mut vector = vec![0.0; self.dimensions];
        let lowered = text.to_lowercase();

        for token in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            self.accumulate(&mut vector, token.as_bytes(), TOKEN_SEED, 1.0);

            let padded: Vec<char> = format!("#{token}#").chars().collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                self.accumulate(&mut vector, trigram.as_bytes(), TRIGRAM_SEED, TRIGRAM_WEIGHT);
            }
        }

        let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }

    fn accumulate(&self, vector: &mut [f64], feature: &[u8], seed: u64, weight: f64) {
        let hash = xxh64(feature, seed);
        let bucket = (hash % self.dimensions as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

impl EmbeddingProvider for HashingEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: String) -> Result<Vec<f64>, EmbedError> {
        Ok(self.embed_text(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clustering::euclidean_distance;

    #[test]
    fn test_embedding_is_deterministic_and_normalized() {
        let embedder = HashingEmbedder::new(128);
        let a = embedder.embed_text("Orthopedic Surgeon");
        let b = embedder.embed_text("Orthopedic Surgeon");
        assert_eq!(a, b);
        let norm: f64 = a.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_dimensions_clamp_to_one() {
        let embedder = HashingEmbedder::new(0);
        assert_eq!(embedder.dimensions(), 1);
        assert_eq!(embedder.model_id(), "hashing-xxh64-1");
        assert_eq!(embedder.embed_text("Welder").len(), 1);
    }

    #[test]
    fn test_case_is_ignored() {
        let embedder = HashingEmbedder::new(64);
        assert_eq!(embedder.embed_text("WELDER"), embedder.embed_text("welder"));
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashingEmbedder::new(16);
        assert!(embedder.embed_text("  ").iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_shared_words_are_closer() {
        let embedder = HashingEmbedder::new(256);
        let fitter = embedder.embed_text("Pipe Fitter");
        let welder = embedder.embed_text("Pipe Welder");
        let nurse = embedder.embed_text("Clinic Nurse");
        assert!(euclidean_distance(&fitter, &welder) < euclidean_distance(&fitter, &nurse));
    }

    #[tokio::test]
    async fn test_provider_trait() {
        let embedder = HashingEmbedder::new(32);
        assert_eq!(embedder.model_id(), "hashing-xxh64-32");
        let v = embedder.embed("Welder".to_string()).await.unwrap();
        assert_eq!(v.len(), embedder.dimensions());
    }
}
