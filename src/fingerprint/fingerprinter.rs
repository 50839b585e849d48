//! Fingerprinting engine: validation, canonical key and embedding.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::key::canonical_key;
use super::normalize::normalize_prompt;
use crate::embeddings::Embedder;
use crate::types::{AssetType, Fingerprint};
use crate::{Error, Result};

pub const DEFAULT_EMBED_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MIN_DURATION_SECS: u32 = 1;
pub const DEFAULT_MAX_DURATION_SECS: u32 = 600;

/// Computes the deterministic identity of a generation request.
///
/// Validation and key derivation are pure; only the embedding call touches
/// the outside world, and it is bounded by `embed_timeout` so a stalled
/// provider can never stall resolution.
pub struct Fingerprinter {
    embedder: Arc<dyn Embedder>,
    embed_timeout: Duration,
    min_duration: u32,
    max_duration: u32,
}

impl Fingerprinter {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            embed_timeout: DEFAULT_EMBED_TIMEOUT,
            min_duration: DEFAULT_MIN_DURATION_SECS,
            max_duration: DEFAULT_MAX_DURATION_SECS,
        }
    }

    pub fn with_embed_timeout(mut self, timeout: Duration) -> Self {
        self.embed_timeout = timeout;
        self
    }

    pub fn with_duration_bounds(mut self, min: u32, max: u32) -> Self {
        self.min_duration = min;
        self.max_duration = max;
        self
    }

    /// Normalizes the prompt and checks request bounds. Returns the
    /// normalized prompt; all fingerprinting goes through here first.
    pub fn validate(&self, raw_prompt: &str, duration: u32) -> Result<String> {
        let normalized = normalize_prompt(raw_prompt);
        if normalized.is_empty() {
            return Err(Error::invalid_prompt(
                "Prompt is empty after normalization",
            ));
        }
        if duration < self.min_duration || duration > self.max_duration {
            return Err(Error::invalid_duration(format!(
                "Duration {}s outside allowed range {}..={}s",
                duration, self.min_duration, self.max_duration
            )));
        }
        Ok(normalized)
    }

    /// Full fingerprint including the embedding.
    ///
    /// Embedding failures and timeouts surface as
    /// [`Error::EmbeddingUnavailable`]; callers that can live without a
    /// vector fall back to [`Fingerprinter::fingerprint_unembedded`].
    pub async fn fingerprint(
        &self,
        raw_prompt: &str,
        duration: u32,
        asset_type: AssetType,
    ) -> Result<Fingerprint> {
        let normalized = self.validate(raw_prompt, duration)?;
        let key = canonical_key(&normalized, duration, asset_type);
        let attempt =
            tokio::time::timeout(self.embed_timeout, self.embedder.embed(&normalized)).await;
        let embedding = match attempt {
            Ok(result) => result?,
            Err(_) => {
                return Err(Error::embedding_unavailable(format!(
                    "Embedding timed out after {}ms",
                    self.embed_timeout.as_millis()
                )))
            }
        };
        if embedding.len() != self.embedder.dimensions() {
            return Err(Error::embedding_unavailable(format!(
                "Embedder returned {} dimensions, expected {}",
                embedding.len(),
                self.embedder.dimensions()
            )));
        }
        debug!(key = %key, provider = self.embedder.name(), "request fingerprinted");
        Ok(Fingerprint {
            canonical_key: key,
            normalized_prompt: normalized,
            raw_prompt: raw_prompt.to_string(),
            embedding: Some(embedding),
        })
    }

    /// Fingerprint without an embedding, for exact-match-only resolution
    /// while the embedding provider is down.
    pub fn fingerprint_unembedded(
        &self,
        raw_prompt: &str,
        duration: u32,
        asset_type: AssetType,
    ) -> Result<Fingerprint> {
        let normalized = self.validate(raw_prompt, duration)?;
        let key = canonical_key(&normalized, duration, asset_type);
        Ok(Fingerprint {
            canonical_key: key,
            normalized_prompt: normalized,
            raw_prompt: raw_prompt.to_string(),
            embedding: None,
        })
    }

    /// Width of the embeddings this fingerprinter produces.
    pub fn dimensions(&self) -> usize {
        self.embedder.dimensions()
    }
}
