//! Resolution statistics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time snapshot of arbiter counters.
#[derive(Debug, Clone, Default)]
pub struct ArbiterStats {
    pub exact_hits: u64,
    pub similarity_hits: u64,
    pub misses: u64,
    pub commits: u64,
    pub duplicate_commits: u64,
    pub embedding_failures: u64,
    pub similarity_failures: u64,
    pub rejected_requests: u64,
}

impl ArbiterStats {
    pub fn hits(&self) -> u64 {
        self.exact_hits + self.similarity_hits
    }

    /// Hits over resolved requests. Rejected requests do not count.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits() + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits() as f64 / total as f64
        }
    }
}

pub(super) struct AtomicStats {
    pub(super) exact_hits: AtomicU64,
    pub(super) similarity_hits: AtomicU64,
    pub(super) misses: AtomicU64,
    pub(super) commits: AtomicU64,
    pub(super) duplicate_commits: AtomicU64,
    pub(super) embedding_failures: AtomicU64,
    pub(super) similarity_failures: AtomicU64,
    pub(super) rejected_requests: AtomicU64,
}

impl AtomicStats {
    pub(super) fn new() -> Self {
        Self {
            exact_hits: AtomicU64::new(0),
            similarity_hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            commits: AtomicU64::new(0),
            duplicate_commits: AtomicU64::new(0),
            embedding_failures: AtomicU64::new(0),
            similarity_failures: AtomicU64::new(0),
            rejected_requests: AtomicU64::new(0),
        }
    }

    pub(super) fn to_stats(&self) -> ArbiterStats {
        ArbiterStats {
            exact_hits: self.exact_hits.load(Ordering::Relaxed),
            similarity_hits: self.similarity_hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            commits: self.commits.load(Ordering::Relaxed),
            duplicate_commits: self.duplicate_commits.load(Ordering::Relaxed),
            embedding_failures: self.embedding_failures.load(Ordering::Relaxed),
            similarity_failures: self.similarity_failures.load(Ordering::Relaxed),
            rejected_requests: self.rejected_requests.load(Ordering::Relaxed),
        }
    }
}
