//! Cache arbiter: the resolve/commit decision engine.

use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use super::policy::CachePolicy;
use super::stats::{ArbiterStats, AtomicStats};
use crate::embeddings::{Embedder, HashEmbedder};
use crate::fingerprint::{canonical_key, Fingerprinter};
use crate::index::{ExactIndex, ScanIndex, SimilarityIndex};
use crate::registry::{ArtifactRegistry, ArtifactStore, MemoryStore};
use crate::resilience::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerSnapshot};
use crate::types::{ArtifactRecord, AssetType, CacheOutcome, CommitOutcome, Fingerprint, SearchHit};
use crate::{Error, Result};

/// Front door of the cache: decides Hit or Miss for incoming requests and
/// owns the only write path into the indexes and the registry.
///
/// Resolution order is fixed: validate, fingerprint, exact lookup,
/// similarity lookup, miss. Degradations only ever narrow the answer
/// toward `Miss`; no failure path can manufacture a hit.
pub struct CacheArbiter {
    policy: CachePolicy,
    fingerprinter: Fingerprinter,
    exact: ExactIndex,
    similarity: Arc<dyn SimilarityIndex>,
    registry: ArtifactRegistry,
    breaker: CircuitBreaker,
    commit_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
    stats: Arc<AtomicStats>,
}

impl CacheArbiter {
    pub fn builder() -> CacheArbiterBuilder {
        CacheArbiterBuilder::new()
    }

    /// Resolves a generation request against the cache.
    ///
    /// Returns `Hit` with the matched record (usage already counted) or
    /// `Miss` with the fingerprint to pass back to [`CacheArbiter::commit`]
    /// once the media has been generated.
    pub async fn resolve(
        &self,
        raw_prompt: &str,
        duration: u32,
        asset_type: AssetType,
    ) -> Result<CacheOutcome> {
        // Validation happens before the provider is ever consulted.
        let base = match self
            .fingerprinter
            .fingerprint_unembedded(raw_prompt, duration, asset_type)
        {
            Ok(fingerprint) => fingerprint,
            Err(e) => {
                self.stats.rejected_requests.fetch_add(1, Ordering::Relaxed);
                return Err(e);
            }
        };

        let fingerprint = if self.breaker.allow().is_ok() {
            match self
                .fingerprinter
                .fingerprint(raw_prompt, duration, asset_type)
                .await
            {
                Ok(fingerprint) => {
                    self.breaker.on_success();
                    fingerprint
                }
                Err(Error::EmbeddingUnavailable { message, .. }) => {
                    self.breaker.on_failure();
                    self.stats.embedding_failures.fetch_add(1, Ordering::Relaxed);
                    warn!(error = %message, "embedding unavailable, resolving exact-only");
                    base
                }
                Err(e) => return Err(e),
            }
        } else {
            self.stats.embedding_failures.fetch_add(1, Ordering::Relaxed);
            debug!("embedding circuit open, resolving exact-only");
            base
        };

        if let Some(record) = self.exact.lookup(&fingerprint.canonical_key) {
            self.bump_usage(&record).await;
            self.stats.exact_hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %fingerprint.canonical_key, usage = record.usage(), "exact cache hit");
            return Ok(CacheOutcome::Hit(record));
        }

        if let Some(embedding) = fingerprint.embedding.as_deref() {
            match self
                .similarity
                .search(embedding, asset_type, self.policy.match_count)
                .await
            {
                Ok(hits) => {
                    if let Some(chosen) = self.select_candidate(&hits, duration) {
                        self.bump_usage(&chosen.record).await;
                        self.stats.similarity_hits.fetch_add(1, Ordering::Relaxed);
                        debug!(
                            id = %chosen.record.id,
                            similarity = chosen.similarity,
                            "similarity cache hit"
                        );
                        return Ok(CacheOutcome::Hit(chosen.record));
                    }
                }
                Err(e) => {
                    self.stats.similarity_failures.fetch_add(1, Ordering::Relaxed);
                    warn!(error = %e, "similarity search failed, degrading to miss");
                }
            }
        }

        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        debug!(key = %fingerprint.canonical_key, "cache miss");
        Ok(CacheOutcome::Miss(fingerprint))
    }

    /// Stores a freshly generated artifact under a fingerprint previously
    /// returned by [`CacheArbiter::resolve`].
    ///
    /// At most one record can ever be committed per canonical key. When a
    /// concurrent or earlier commit won, the existing record comes back as
    /// `AlreadyCached` and the new artifact should be discarded.
    pub async fn commit(
        &self,
        fingerprint: Fingerprint,
        duration: u32,
        asset_type: AssetType,
        location_ref: impl Into<String>,
    ) -> Result<CommitOutcome> {
        let expected = canonical_key(&fingerprint.normalized_prompt, duration, asset_type);
        if expected != fingerprint.canonical_key {
            return Err(Error::validation(
                "Fingerprint does not match the committed duration or asset type",
            ));
        }

        let key = fingerprint.canonical_key.clone();
        let lock = self.key_lock(&key);
        let outcome = {
            let _guard = lock.lock().await;
            self.commit_locked(fingerprint, duration, asset_type, location_ref.into())
                .await
        };
        self.release_key_lock(&key, &lock);
        outcome
    }

    async fn commit_locked(
        &self,
        fingerprint: Fingerprint,
        duration: u32,
        asset_type: AssetType,
        location_ref: String,
    ) -> Result<CommitOutcome> {
        let key = fingerprint.canonical_key.clone();
        if let Some(existing) = self.exact.lookup(&key) {
            self.stats.duplicate_commits.fetch_add(1, Ordering::Relaxed);
            self.bump_usage(&existing).await;
            debug!(key = %key, "commit raced a finished commit, reusing record");
            return Ok(CommitOutcome::AlreadyCached(existing));
        }

        let record = Arc::new(ArtifactRecord::new(
            asset_type,
            fingerprint.raw_prompt,
            fingerprint.normalized_prompt,
            duration,
            fingerprint.embedding,
            key.clone(),
            location_ref,
        ));

        let record = self.registry.create(record).await?;
        if let Err(existing) = self.exact.try_insert(record.clone()) {
            self.stats.duplicate_commits.fetch_add(1, Ordering::Relaxed);
            self.bump_usage(&existing).await;
            return Ok(CommitOutcome::AlreadyCached(existing));
        }
        if let Err(e) = self.similarity.insert(record.clone()).await {
            // Roll back so no record stays visible in only one index.
            self.exact.remove(&key);
            return Err(Error::index_write_failure(
                key,
                format!("similarity insert failed: {}", e),
            ));
        }

        self.stats.commits.fetch_add(1, Ordering::Relaxed);
        info!(id = %record.id, key = %record.canonical_key, "artifact committed");
        Ok(CommitOutcome::Created(record))
    }

    /// Rebuilds both indexes from the registry, newest rows first so the
    /// latest commit wins a contested canonical key. Returns the number of
    /// records loaded.
    pub async fn warm(&self) -> Result<usize> {
        let mut rows = self.registry.all().await?;
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        let mut loaded = 0usize;
        for record in rows {
            if self.exact.try_insert(record.clone()).is_ok() {
                if let Err(e) = self.similarity.insert(record.clone()).await {
                    self.exact.remove(&record.canonical_key);
                    return Err(Error::index_write_failure(
                        record.canonical_key.clone(),
                        format!("similarity insert failed during warm: {}", e),
                    ));
                }
                loaded += 1;
            }
        }
        info!(loaded, store = self.registry.store_name(), "indexes warmed from registry");
        Ok(loaded)
    }

    /// Applies the top-candidate rule from the matching policy.
    ///
    /// Only the winner of the top-similarity group is tested; a
    /// lower-scored candidate that would pass the duration tolerance is
    /// never promoted over it.
    fn select_candidate(&self, hits: &[SearchHit], requested_duration: u32) -> Option<SearchHit> {
        let best = hits.first()?;
        let chosen = hits
            .iter()
            .filter(|h| h.similarity == best.similarity)
            .min_by(|a, b| {
                let da = a.record.duration.abs_diff(requested_duration);
                let db = b.record.duration.abs_diff(requested_duration);
                da.cmp(&db)
                    .then(b.record.created_at.cmp(&a.record.created_at))
                    .then(a.record.id.cmp(&b.record.id))
            })?;
        if self
            .policy
            .accepts(chosen.similarity, chosen.record.duration, requested_duration)
        {
            Some(chosen.clone())
        } else {
            None
        }
    }

    async fn bump_usage(&self, record: &Arc<ArtifactRecord>) {
        if let Err(e) = self.registry.increment_usage(record.id).await {
            warn!(id = %record.id, error = %e, "usage increment failed");
        }
    }

    fn key_lock(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.commit_locks.lock().unwrap();
        locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    fn release_key_lock(&self, key: &str, lock: &Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self.commit_locks.lock().unwrap();
        // Map entry + our clone are the only handles: nobody is waiting.
        if Arc::strong_count(lock) <= 2 {
            locks.remove(key);
        }
    }

    pub fn stats(&self) -> ArbiterStats {
        self.stats.to_stats()
    }

    pub fn breaker_snapshot(&self) -> CircuitBreakerSnapshot {
        self.breaker.snapshot()
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    pub fn registry(&self) -> &ArtifactRegistry {
        &self.registry
    }

    /// Number of records reachable by exact lookup.
    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}

/// Builder wiring policy, embedder, similarity index and store together.
/// Every component has a self-contained default so
/// `CacheArbiter::builder().build()` yields a working in-memory cache.
pub struct CacheArbiterBuilder {
    policy: CachePolicy,
    embedder: Option<Arc<dyn Embedder>>,
    similarity: Option<Arc<dyn SimilarityIndex>>,
    store: Option<Arc<dyn ArtifactStore>>,
    breaker: CircuitBreakerConfig,
}

impl CacheArbiterBuilder {
    pub fn new() -> Self {
        Self {
            policy: CachePolicy::default(),
            embedder: None,
            similarity: None,
            store: None,
            breaker: CircuitBreakerConfig::default(),
        }
    }

    pub fn policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn similarity_index(mut self, index: Arc<dyn SimilarityIndex>) -> Self {
        self.similarity = Some(index);
        self
    }

    pub fn store(mut self, store: Arc<dyn ArtifactStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn breaker(mut self, config: CircuitBreakerConfig) -> Self {
        self.breaker = config;
        self
    }

    pub fn build(self) -> Result<CacheArbiter> {
        self.policy.validate()?;
        let embedder = self
            .embedder
            .unwrap_or_else(|| Arc::new(HashEmbedder::default()));
        let similarity = self
            .similarity
            .unwrap_or_else(|| Arc::new(ScanIndex::new(embedder.dimensions())));
        let store = self.store.unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let fingerprinter = Fingerprinter::new(embedder)
            .with_embed_timeout(self.policy.embed_timeout)
            .with_duration_bounds(self.policy.min_duration_secs, self.policy.max_duration_secs);
        Ok(CacheArbiter {
            policy: self.policy,
            fingerprinter,
            exact: ExactIndex::new(),
            similarity,
            registry: ArtifactRegistry::new(store),
            breaker: CircuitBreaker::new(self.breaker),
            commit_locks: Mutex::new(HashMap::new()),
            stats: Arc::new(AtomicStats::new()),
        })
    }
}

impl Default for CacheArbiterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
