//! Embedding providers: the `Embedder` trait and an offline hash embedder.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::vectors::normalize_vector;
use crate::{Error, Result};

/// Default embedding width, matching common sentence-transformer models.
pub const DEFAULT_DIMENSIONS: usize = 384;

/// Turns prompt text into a fixed-width embedding vector.
///
/// Implementations must be deterministic for a given input within one
/// process lifetime; the cache compares vectors produced at different
/// times and a drifting embedder would silently break similarity hits.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds one piece of text. Any failure (network, quota, model) must
    /// surface as [`Error::EmbeddingUnavailable`] so callers can degrade
    /// to exact-key matching instead of aborting.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Width of the vectors this embedder produces.
    fn dimensions(&self) -> usize;

    /// Short provider name for logs.
    fn name(&self) -> &'static str;
}

/// Deterministic bag-of-words embedder with no external dependencies.
///
/// Each token is hashed into one of `dimensions` buckets and the bucket
/// count incremented, then the vector is L2-normalized. All components are
/// non-negative, so prompts sharing most of their tokens score high cosine
/// similarity while disjoint prompts score near zero. Useful for tests,
/// local development and as a degraded-mode stand-in for a real model.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(Error::configuration(
                "Embedding dimensions must be at least 1",
            ));
        }
        Ok(Self { dimensions })
    }

    /// Splits on non-alphanumeric boundaries and lowercases, so punctuation
    /// and casing never shift a token into a different bucket.
    fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
    }

    fn bucket(&self, token: &str) -> usize {
        let digest = Sha256::digest(token.as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        (u64::from_be_bytes(prefix) % self.dimensions as u64) as usize
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in Self::tokens(text) {
            vector[self.bucket(&token)] += 1.0;
        }
        normalize_vector(&vector)
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
        }
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &'static str {
        "hash"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::vectors::{cosine_similarity, magnitude};

    #[test]
    fn test_rejects_zero_dimensions() {
        assert!(HashEmbedder::new(0).is_err());
        assert!(HashEmbedder::new(1).is_ok());
    }

    #[tokio::test]
    async fn test_deterministic_and_unit_length() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed("calm ocean waves, soft piano").await.unwrap();
        let b = embedder.embed("calm ocean waves, soft piano").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), DEFAULT_DIMENSIONS);
        assert!((magnitude(&a) - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_case_and_punctuation_invariant_tokens() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed("Calm OCEAN waves!").await.unwrap();
        let b = embedder.embed("calm ocean waves").await.unwrap();
        let score = cosine_similarity(&a, &b).unwrap();
        assert!((score - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_overlapping_prompts_score_high() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed("calm ocean waves, soft piano").await.unwrap();
        let b = embedder
            .embed("Calm ocean waves with soft piano")
            .await
            .unwrap();
        let score = cosine_similarity(&a, &b).unwrap();
        // Five of six tokens shared; well above typical thresholds.
        assert!(score >= 0.9, "expected >= 0.9, got {score}");
    }

    #[tokio::test]
    async fn test_disjoint_prompts_score_low() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed("calm ocean waves soft piano").await.unwrap();
        let b = embedder
            .embed("aggressive industrial techno drums")
            .await
            .unwrap();
        let score = cosine_similarity(&a, &b).unwrap();
        assert!(score < 0.5, "expected < 0.5, got {score}");
    }

    #[tokio::test]
    async fn test_text_without_tokens_yields_zero_vector() {
        let embedder = HashEmbedder::default();
        let v = embedder.embed("!!! ---").await.unwrap();
        assert!(v.iter().all(|&x| x == 0.0));
    }
}
