//! Similarity index over prompt embeddings.

use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::embeddings::cosine_similarity;
use crate::types::{ArtifactRecord, AssetType, SearchHit};
use crate::{Error, Result};

/// Vector search seam. The default [`ScanIndex`] is an exact scan; an
/// ANN-backed implementation can be swapped in without touching callers.
#[async_trait]
pub trait SimilarityIndex: Send + Sync {
    /// Top-k candidates of the requested asset type, ordered by cosine
    /// similarity descending. Records without an embedding never appear.
    async fn search(
        &self,
        embedding: &[f32],
        asset_type: AssetType,
        k: usize,
    ) -> Result<Vec<SearchHit>>;

    /// Makes a record searchable. Online; never rebuilds.
    async fn insert(&self, record: Arc<ArtifactRecord>) -> Result<()>;

    /// Number of searchable records across all asset types.
    async fn len(&self) -> usize;

    fn name(&self) -> &'static str;
}

/// One asset type's records. Readers load the current snapshot and scan it
/// untouched; writers clone-and-swap under the writer mutex, so a search
/// sees either the pre-insert or post-insert vector set, never a torn one.
struct Partition {
    snapshot: ArcSwap<Vec<Arc<ArtifactRecord>>>,
    writer: Mutex<()>,
}

impl Partition {
    fn new() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(Vec::new()),
            writer: Mutex::new(()),
        }
    }
}

/// Exact cosine scan over copy-on-write snapshots, partitioned per asset
/// type so music can never answer a video request.
pub struct ScanIndex {
    dimensions: usize,
    music: Partition,
    video: Partition,
}

impl ScanIndex {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            music: Partition::new(),
            video: Partition::new(),
        }
    }

    fn partition(&self, asset_type: AssetType) -> &Partition {
        match asset_type {
            AssetType::Music => &self.music,
            AssetType::Video => &self.video,
        }
    }
}

#[async_trait]
impl SimilarityIndex for ScanIndex {
    async fn search(
        &self,
        embedding: &[f32],
        asset_type: AssetType,
        k: usize,
    ) -> Result<Vec<SearchHit>> {
        if embedding.len() != self.dimensions {
            return Err(Error::similarity_failure(format!(
                "Query has {} dimensions, index expects {}",
                embedding.len(),
                self.dimensions
            )));
        }
        let snapshot = self.partition(asset_type).snapshot.load_full();
        let mut hits = Vec::with_capacity(snapshot.len().min(k));
        for record in snapshot.iter() {
            let Some(stored) = record.embedding.as_deref() else {
                continue;
            };
            let similarity = cosine_similarity(embedding, stored).map_err(|e| {
                Error::similarity_failure(format!(
                    "Stored vector for record {} is unusable: {}",
                    record.id, e
                ))
            })?;
            hits.push(SearchHit {
                record: record.clone(),
                similarity,
            });
        }
        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);
        Ok(hits)
    }

    async fn insert(&self, record: Arc<ArtifactRecord>) -> Result<()> {
        let Some(embedding) = record.embedding.as_deref() else {
            // Degraded records serve exact matches only.
            return Ok(());
        };
        if embedding.len() != self.dimensions {
            return Err(Error::similarity_failure(format!(
                "Record {} has {} dimensions, index expects {}",
                record.id,
                embedding.len(),
                self.dimensions
            )));
        }
        let partition = self.partition(record.asset_type);
        let _guard = partition.writer.lock().await;
        let current = partition.snapshot.load_full();
        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend(current.iter().cloned());
        next.push(record);
        partition.snapshot.store(Arc::new(next));
        Ok(())
    }

    async fn len(&self) -> usize {
        self.music.snapshot.load().len() + self.video.snapshot.load().len()
    }

    fn name(&self) -> &'static str {
        "scan"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(asset_type: AssetType, embedding: Option<Vec<f32>>) -> Arc<ArtifactRecord> {
        let key = uuid::Uuid::new_v4().to_string();
        Arc::new(ArtifactRecord::new(
            asset_type,
            "prompt",
            "prompt",
            60,
            embedding,
            key,
            "s3://bucket/a",
        ))
    }

    #[tokio::test]
    async fn test_results_ordered_by_similarity_desc() {
        let index = ScanIndex::new(2);
        let exact = record(AssetType::Music, Some(vec![1.0, 0.0]));
        let close = record(AssetType::Music, Some(vec![0.6, 0.8]));
        let orthogonal = record(AssetType::Music, Some(vec![0.0, 1.0]));
        for r in [&orthogonal, &exact, &close] {
            index.insert(r.clone()).await.unwrap();
        }

        let hits = index.search(&[1.0, 0.0], AssetType::Music, 5).await.unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].record.id, exact.id);
        assert!((hits[0].similarity - 1.0).abs() < 1e-6);
        assert_eq!(hits[1].record.id, close.id);
        assert!((hits[1].similarity - 0.6).abs() < 1e-6);
        assert_eq!(hits[2].record.id, orthogonal.id);
    }

    #[tokio::test]
    async fn test_asset_types_are_isolated() {
        let index = ScanIndex::new(2);
        index
            .insert(record(AssetType::Video, Some(vec![1.0, 0.0])))
            .await
            .unwrap();

        let music_hits = index.search(&[1.0, 0.0], AssetType::Music, 5).await.unwrap();
        assert!(music_hits.is_empty());
        let video_hits = index.search(&[1.0, 0.0], AssetType::Video, 5).await.unwrap();
        assert_eq!(video_hits.len(), 1);
    }

    #[tokio::test]
    async fn test_unembedded_records_are_not_searchable() {
        let index = ScanIndex::new(2);
        index.insert(record(AssetType::Music, None)).await.unwrap();
        assert_eq!(index.len().await, 0);
        let hits = index.search(&[1.0, 0.0], AssetType::Music, 5).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_k_truncates_results() {
        let index = ScanIndex::new(2);
        for _ in 0..8 {
            index
                .insert(record(AssetType::Music, Some(vec![1.0, 0.0])))
                .await
                .unwrap();
        }
        let hits = index.search(&[1.0, 0.0], AssetType::Music, 3).await.unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[tokio::test]
    async fn test_query_dimension_mismatch_is_an_error() {
        let index = ScanIndex::new(2);
        let err = index.search(&[1.0, 0.0, 0.0], AssetType::Music, 5).await;
        assert!(matches!(err, Err(Error::SimilaritySearchFailure { .. })));
    }

    #[tokio::test]
    async fn test_insert_rejects_wrong_width() {
        let index = ScanIndex::new(2);
        let err = index
            .insert(record(AssetType::Music, Some(vec![1.0, 0.0, 0.0])))
            .await;
        assert!(matches!(err, Err(Error::SimilaritySearchFailure { .. })));
        assert_eq!(index.len().await, 0);
    }
}
