//! # gencache-rust
//!
//! 这是面向 AI 生成媒体的语义缓存引擎,在重新生成之前先复用语义等价的已有产物。
//!
//! Semantic cache and deduplication engine for AI-generated media - reuse
//! previously generated music and video instead of paying for regeneration.
//!
//! ## Overview
//!
//! Generating a media asset costs orders of magnitude more than serving a
//! cached one. This library sits in front of the generation pipeline and
//! answers one question per request: has a semantically equivalent asset
//! already been produced? It matches exact requests by canonical key and
//! near-duplicate prompts by embedding similarity, while never returning an
//! asset of a meaningfully different length.
//!
//! ## Core Philosophy
//!
//! - **Cache-First**: Every request resolves against the cache before any
//!   generation work is scheduled
//! - **Fail-Open**: Embedding or search failures degrade matching, they
//!   never fail the request or produce a false hit
//! - **Single-Writer Keys**: At most one artifact is ever committed per
//!   canonical key, no matter how many generators race
//! - **Type-Safe**: Strongly typed outcomes distinguish hits, misses, and
//!   duplicate commits
//!
//! ## Key Features
//!
//! - **Cache Arbiter**: [`CacheArbiter`] resolves requests and commits
//!   freshly generated artifacts
//! - **Fingerprinting**: Prompt normalization, canonical keys, and optional
//!   embeddings via the [`fingerprint`] module
//! - **Similarity Search**: Cosine-scored candidate ranking with duration
//!   guardrails via the [`index`] module
//! - **Durable Registry**: Pluggable record storage and usage counting via
//!   the [`registry`] module
//! - **Resilience**: Circuit breaker around embedding providers via the
//!   [`resilience`] module
//! - **Rotation**: Optional non-semantic per-user track rotation via the
//!   [`rotation`] module
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gencache_rust::{AssetType, CacheArbiter, CacheOutcome};
//!
//! #[tokio::main]
//! async fn main() -> gencache_rust::Result<()> {
//!     let arbiter = CacheArbiter::builder().build()?;
//!
//!     let outcome = arbiter
//!         .resolve("calm ocean waves, soft piano", 120, AssetType::Music)
//!         .await?;
//!
//!     match outcome {
//!         CacheOutcome::Hit(record) => {
//!             println!("serving cached asset {}", record.location_ref);
//!         }
//!         CacheOutcome::Miss(fingerprint) => {
//!             // Generate the asset, then publish it for future requests.
//!             let location = "s3://media/waves.wav";
//!             arbiter
//!                 .commit(fingerprint, 120, AssetType::Music, location)
//!                 .await?;
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`arbiter`] | Cache resolution, commit, and warm-up engine |
//! | [`fingerprint`] | Prompt normalization, canonical keys, embedding orchestration |
//! | [`embeddings`] | Embedding providers and vector math |
//! | [`index`] | Exact-key and similarity indexes |
//! | [`registry`] | Artifact record storage and usage counters |
//! | [`resilience`] | Circuit breaker for embedding providers |
//! | [`types`] | Core type definitions (records, fingerprints, outcomes) |
//! | [`rotation`] | Optional tag-based per-user track rotation |

pub mod arbiter;
pub mod embeddings;
pub mod fingerprint;
pub mod index;
pub mod registry;
pub mod resilience;
pub mod types;

#[cfg(feature = "rotation")]
pub mod rotation;

// Re-export main types for convenience
pub use arbiter::{ArbiterStats, CacheArbiter, CacheArbiterBuilder, CachePolicy};
pub use embeddings::{Embedder, HashEmbedder};
pub use registry::{ArtifactRegistry, ArtifactStore};
pub use types::{
    asset::AssetType,
    outcome::{CacheOutcome, CommitOutcome, Fingerprint, SearchHit},
    record::ArtifactRecord,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
