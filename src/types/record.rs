//! Cached artifact records.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::AssetType;

/// A generated media artifact held by the cache.
///
/// Records are immutable once committed except for the usage counter, which
/// is an atomic so that concurrent hits on an `Arc`-shared record never race.
/// Records with `embedding: None` were committed while the embedding service
/// was unavailable; they still serve exact-key hits but are skipped by
/// similarity search.
#[derive(Debug, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// Unique record identifier.
    pub id: Uuid,
    /// Kind of media this artifact holds.
    pub asset_type: AssetType,
    /// Prompt exactly as the caller submitted it.
    pub raw_prompt: String,
    /// Prompt after normalization (lowercased, trimmed, newlines collapsed).
    pub normalized_prompt: String,
    /// Requested duration in whole seconds.
    pub duration: u32,
    /// Embedding of the normalized prompt, absent for degraded commits.
    pub embedding: Option<Vec<f32>>,
    /// Deterministic exact-match key over (normalized_prompt, duration, asset_type).
    pub canonical_key: String,
    /// Opaque pointer to the stored media (URL, object key, file path).
    pub location_ref: String,
    /// Times this record has answered a cache hit.
    #[serde(with = "atomic_u64")]
    pub usage_count: AtomicU64,
    /// Commit timestamp, used to break similarity ties toward fresher records.
    pub created_at: DateTime<Utc>,
}

impl ArtifactRecord {
    /// Builds a fresh record at commit time. Usage starts at zero and only
    /// moves when the record answers a hit.
    pub fn new(
        asset_type: AssetType,
        raw_prompt: impl Into<String>,
        normalized_prompt: impl Into<String>,
        duration: u32,
        embedding: Option<Vec<f32>>,
        canonical_key: impl Into<String>,
        location_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            asset_type,
            raw_prompt: raw_prompt.into(),
            normalized_prompt: normalized_prompt.into(),
            duration,
            embedding,
            canonical_key: canonical_key.into(),
            location_ref: location_ref.into(),
            usage_count: AtomicU64::new(0),
            created_at: Utc::now(),
        }
    }

    /// Current hit count.
    pub fn usage(&self) -> u64 {
        self.usage_count.load(Ordering::Relaxed)
    }

    /// Bumps the hit count and returns the new value.
    pub fn record_hit(&self) -> u64 {
        self.usage_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Whether this record can participate in similarity search.
    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }
}

impl Clone for ArtifactRecord {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            asset_type: self.asset_type,
            raw_prompt: self.raw_prompt.clone(),
            normalized_prompt: self.normalized_prompt.clone(),
            duration: self.duration,
            embedding: self.embedding.clone(),
            canonical_key: self.canonical_key.clone(),
            location_ref: self.location_ref.clone(),
            usage_count: AtomicU64::new(self.usage()),
            created_at: self.created_at,
        }
    }
}

impl PartialEq for ArtifactRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ArtifactRecord {}

/// Serde adapter so the atomic counter round-trips as a plain integer.
mod atomic_u64 {
    use std::sync::atomic::{AtomicU64, Ordering};

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &AtomicU64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.load(Ordering::Relaxed))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<AtomicU64, D::Error> {
        u64::deserialize(deserializer).map(AtomicU64::new)
    }
}
