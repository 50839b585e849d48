//! 制品注册表 — 已缓存媒体记录的持久层与使用计数。
//!
//! Artifact registry: the system-of-record for every committed artifact.
//! Rows are append-only; the usage counter is the only mutable field. The
//! backing store sits behind the [`ArtifactStore`] trait so a durable
//! implementation (database, object store manifest) can replace the
//! in-memory default, and [`ArtifactRegistry::all`] exists so the indexes
//! can be rebuilt from the store on startup.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::types::ArtifactRecord;
use crate::{Error, Result};

/// Persistence seam for artifact rows.
///
/// Implementations must hand back the same `Arc` they were given so the
/// usage counter stays shared with the indexes.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Appends a row. A row with the same id must be rejected.
    async fn create(&self, record: Arc<ArtifactRecord>) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<Arc<ArtifactRecord>>>;
    /// Latest row (by `created_at`) committed under this canonical key.
    async fn get_by_key(&self, canonical_key: &str) -> Result<Option<Arc<ArtifactRecord>>>;
    async fn all(&self) -> Result<Vec<Arc<ArtifactRecord>>>;
    async fn increment_usage(&self, id: Uuid) -> Result<u64>;
    async fn len(&self) -> Result<usize>;
    fn name(&self) -> &'static str;
}

/// In-memory store, the default backing for tests and single-process use.
pub struct MemoryStore {
    rows: RwLock<HashMap<Uuid, Arc<ArtifactRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn create(&self, record: Arc<ArtifactRecord>) -> Result<()> {
        let mut rows = self.rows.write().unwrap();
        if rows.contains_key(&record.id) {
            return Err(Error::validation(format!(
                "Record {} already exists",
                record.id
            )));
        }
        rows.insert(record.id, record);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Arc<ArtifactRecord>>> {
        Ok(self.rows.read().unwrap().get(&id).cloned())
    }

    async fn get_by_key(&self, canonical_key: &str) -> Result<Option<Arc<ArtifactRecord>>> {
        let rows = self.rows.read().unwrap();
        Ok(rows
            .values()
            .filter(|r| r.canonical_key == canonical_key)
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn all(&self) -> Result<Vec<Arc<ArtifactRecord>>> {
        Ok(self.rows.read().unwrap().values().cloned().collect())
    }

    async fn increment_usage(&self, id: Uuid) -> Result<u64> {
        let rows = self.rows.read().unwrap();
        match rows.get(&id) {
            Some(record) => Ok(record.record_hit()),
            None => Err(Error::validation(format!("No record with id {}", id))),
        }
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.rows.read().unwrap().len())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Facade over the configured [`ArtifactStore`].
pub struct ArtifactRegistry {
    store: Arc<dyn ArtifactStore>,
}

impl ArtifactRegistry {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store }
    }

    /// Registry backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Appends the record and returns the shared handle that was stored.
    pub async fn create(&self, record: Arc<ArtifactRecord>) -> Result<Arc<ArtifactRecord>> {
        self.store.create(record.clone()).await?;
        debug!(
            id = %record.id,
            key = %record.canonical_key,
            store = self.store.name(),
            "artifact registered"
        );
        Ok(record)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Arc<ArtifactRecord>>> {
        self.store.get(id).await
    }

    pub async fn get_by_key(&self, canonical_key: &str) -> Result<Option<Arc<ArtifactRecord>>> {
        self.store.get_by_key(canonical_key).await
    }

    pub async fn all(&self) -> Result<Vec<Arc<ArtifactRecord>>> {
        self.store.all().await
    }

    pub async fn increment_usage(&self, id: Uuid) -> Result<u64> {
        self.store.increment_usage(id).await
    }

    pub async fn len(&self) -> Result<usize> {
        self.store.len().await
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AssetType;

    fn record(key: &str) -> Arc<ArtifactRecord> {
        Arc::new(ArtifactRecord::new(
            AssetType::Music,
            "prompt",
            "prompt",
            60,
            None,
            key,
            "s3://bucket/a",
        ))
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let registry = ArtifactRegistry::in_memory();
        let rec = registry.create(record("k1")).await.unwrap();

        let by_id = registry.get(rec.id).await.unwrap().unwrap();
        assert_eq!(by_id.id, rec.id);
        let by_key = registry.get_by_key("k1").await.unwrap().unwrap();
        assert_eq!(by_key.id, rec.id);
        assert_eq!(registry.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let registry = ArtifactRegistry::in_memory();
        let rec = registry.create(record("k1")).await.unwrap();
        let err = registry.create(rec).await;
        assert!(matches!(err, Err(Error::Validation { .. })));
    }

    #[tokio::test]
    async fn test_increment_usage_shares_the_counter() {
        let registry = ArtifactRegistry::in_memory();
        let rec = registry.create(record("k1")).await.unwrap();

        assert_eq!(registry.increment_usage(rec.id).await.unwrap(), 1);
        assert_eq!(registry.increment_usage(rec.id).await.unwrap(), 2);
        // The Arc handed out at create time sees the same counter.
        assert_eq!(rec.usage(), 2);
    }

    #[tokio::test]
    async fn test_increment_usage_unknown_id_errors() {
        let registry = ArtifactRegistry::in_memory();
        let err = registry.increment_usage(Uuid::new_v4()).await;
        assert!(matches!(err, Err(Error::Validation { .. })));
    }

    #[tokio::test]
    async fn test_get_by_key_prefers_latest_row() {
        let registry = ArtifactRegistry::in_memory();
        let older = record("shared");
        registry.create(older.clone()).await.unwrap();
        // Same canonical key committed again later (orphaned-row scenario).
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let newer = record("shared");
        registry.create(newer.clone()).await.unwrap();

        let found = registry.get_by_key("shared").await.unwrap().unwrap();
        assert_eq!(found.id, newer.id);
    }

    #[tokio::test]
    async fn test_all_returns_every_row() {
        let registry = ArtifactRegistry::in_memory();
        registry.create(record("a")).await.unwrap();
        registry.create(record("b")).await.unwrap();
        let rows = registry.all().await.unwrap();
        assert_eq!(rows.len(), 2);
    }
}
