//! Request fingerprints and resolution outcomes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::ArtifactRecord;

/// Deterministic identity computed for an incoming generation request.
///
/// A fingerprint is produced before any index is consulted and is echoed back
/// on a miss so the caller can commit the generated artifact without
/// recomputing the key or the embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fingerprint {
    /// SHA-256 hex digest over the normalized prompt, duration and asset type.
    pub canonical_key: String,
    /// Prompt after normalization, as hashed into the key.
    pub normalized_prompt: String,
    /// Prompt exactly as submitted, carried for the eventual commit.
    pub raw_prompt: String,
    /// Embedding of the normalized prompt, `None` when the embedding
    /// service was unavailable and resolution degraded to exact-only.
    pub embedding: Option<Vec<f32>>,
}

impl Fingerprint {
    /// Whether this fingerprint can participate in similarity search.
    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }
}

/// Result of resolving a request against the cache.
#[derive(Debug, Clone)]
pub enum CacheOutcome {
    /// A cached artifact answers the request. The record's usage counter has
    /// already been bumped.
    Hit(Arc<ArtifactRecord>),
    /// Nothing cached matches. The fingerprint is returned so the caller can
    /// generate the media and commit it under the same identity.
    Miss(Fingerprint),
}

impl CacheOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheOutcome::Hit(_))
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, CacheOutcome::Miss(_))
    }

    /// The matched record, if this outcome is a hit.
    pub fn record(&self) -> Option<&Arc<ArtifactRecord>> {
        match self {
            CacheOutcome::Hit(record) => Some(record),
            CacheOutcome::Miss(_) => None,
        }
    }

    /// The miss fingerprint, if this outcome is a miss.
    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        match self {
            CacheOutcome::Hit(_) => None,
            CacheOutcome::Miss(fingerprint) => Some(fingerprint),
        }
    }
}

/// Result of committing a freshly generated artifact.
#[derive(Debug, Clone)]
pub enum CommitOutcome {
    /// The artifact was stored and is now visible to future lookups.
    Created(Arc<ArtifactRecord>),
    /// A record under the same canonical key already existed; the existing
    /// record is returned and the new artifact was discarded.
    AlreadyCached(Arc<ArtifactRecord>),
}

impl CommitOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, CommitOutcome::Created(_))
    }

    /// The stored record, whichever branch won.
    pub fn record(&self) -> &Arc<ArtifactRecord> {
        match self {
            CommitOutcome::Created(record) => record,
            CommitOutcome::AlreadyCached(record) => record,
        }
    }
}

/// One candidate returned by a similarity search, scored against the query.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub record: Arc<ArtifactRecord>,
    /// Cosine similarity in `[-1.0, 1.0]` between query and record embedding.
    pub similarity: f32,
}
