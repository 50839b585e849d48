//! Matching policy.

use std::time::Duration;

use crate::fingerprint::{
    DEFAULT_EMBED_TIMEOUT, DEFAULT_MAX_DURATION_SECS, DEFAULT_MIN_DURATION_SECS,
};
use crate::{Error, Result};

pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.9;
pub const DEFAULT_DURATION_TOLERANCE_SECS: u32 = 5;
pub const DEFAULT_MATCH_COUNT: usize = 5;

/// Tunable knobs deciding when a cached artifact answers a request.
#[derive(Debug, Clone)]
pub struct CachePolicy {
    /// Minimum cosine similarity for a semantic match (inclusive).
    pub similarity_threshold: f32,
    /// Maximum |candidate.duration - requested| in seconds (inclusive).
    pub duration_tolerance_secs: u32,
    /// Candidates fetched per similarity search (top-k).
    pub match_count: usize,
    /// Upper bound on one embedding call during fingerprinting.
    pub embed_timeout: Duration,
    pub min_duration_secs: u32,
    pub max_duration_secs: u32,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            duration_tolerance_secs: DEFAULT_DURATION_TOLERANCE_SECS,
            match_count: DEFAULT_MATCH_COUNT,
            embed_timeout: DEFAULT_EMBED_TIMEOUT,
            min_duration_secs: DEFAULT_MIN_DURATION_SECS,
            max_duration_secs: DEFAULT_MAX_DURATION_SECS,
        }
    }
}

impl CachePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_duration_tolerance(mut self, secs: u32) -> Self {
        self.duration_tolerance_secs = secs;
        self
    }

    pub fn with_match_count(mut self, count: usize) -> Self {
        self.match_count = count;
        self
    }

    pub fn with_embed_timeout(mut self, timeout: Duration) -> Self {
        self.embed_timeout = timeout;
        self
    }

    pub fn with_duration_bounds(mut self, min: u32, max: u32) -> Self {
        self.min_duration_secs = min;
        self.max_duration_secs = max;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.similarity_threshold.is_finite()
            || !(-1.0..=1.0).contains(&self.similarity_threshold)
        {
            return Err(Error::configuration(format!(
                "Similarity threshold must be within [-1.0, 1.0], got {}",
                self.similarity_threshold
            )));
        }
        if self.match_count == 0 {
            return Err(Error::configuration("Match count must be at least 1"));
        }
        if self.min_duration_secs == 0 || self.min_duration_secs > self.max_duration_secs {
            return Err(Error::configuration(format!(
                "Invalid duration bounds {}..={}",
                self.min_duration_secs, self.max_duration_secs
            )));
        }
        if self.embed_timeout.is_zero() {
            return Err(Error::configuration("Embed timeout must be non-zero"));
        }
        Ok(())
    }

    /// The acceptance test applied to the winning similarity candidate.
    /// Both bounds are inclusive.
    pub fn accepts(&self, similarity: f32, candidate_duration: u32, requested_duration: u32) -> bool {
        similarity >= self.similarity_threshold
            && candidate_duration.abs_diff(requested_duration) <= self.duration_tolerance_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = CachePolicy::default();
        assert_eq!(policy.similarity_threshold, 0.9);
        assert_eq!(policy.duration_tolerance_secs, 5);
        assert_eq!(policy.match_count, 5);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let policy = CachePolicy::new()
            .with_similarity_threshold(0.85)
            .with_duration_tolerance(10)
            .with_match_count(3);
        assert_eq!(policy.similarity_threshold, 0.85);
        assert_eq!(policy.duration_tolerance_secs, 10);
        assert_eq!(policy.match_count, 3);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(CachePolicy::new()
            .with_similarity_threshold(1.5)
            .validate()
            .is_err());
        assert!(CachePolicy::new()
            .with_similarity_threshold(f32::NAN)
            .validate()
            .is_err());
        assert!(CachePolicy::new().with_match_count(0).validate().is_err());
        assert!(CachePolicy::new()
            .with_duration_bounds(10, 5)
            .validate()
            .is_err());
        assert!(CachePolicy::new()
            .with_embed_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }

    #[test]
    fn test_acceptance_boundaries_are_inclusive() {
        let policy = CachePolicy::default();
        // Exactly at both thresholds: accepted.
        assert!(policy.accepts(0.9, 115, 120));
        assert!(policy.accepts(0.9, 125, 120));
        // Just under similarity: rejected.
        assert!(!policy.accepts(0.89, 120, 120));
        // Just over tolerance: rejected.
        assert!(!policy.accepts(1.0, 114, 120));
        assert!(!policy.accepts(1.0, 126, 120));
    }
}
