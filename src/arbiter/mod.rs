//! 缓存仲裁模块：命中判定、提交协调与统计。
//!
//! # Arbiter Module
//!
//! The decision engine in front of expensive media generation. Callers ask
//! [`CacheArbiter::resolve`] whether a request is already answered by a
//! cached artifact; on a miss they generate externally and hand the result
//! to [`CacheArbiter::commit`] under the fingerprint the miss returned.
//!
//! ## Overview
//!
//! - **Resolution order is fixed**: validate, fingerprint, exact lookup,
//!   similarity lookup, miss
//! - **Degradation narrows, never widens**: an unreachable embedding
//!   provider reduces resolution to exact-only; a failing similarity index
//!   turns into a miss, never a false hit
//! - **Commits are exclusive per canonical key**: concurrent commits of
//!   the same request yield exactly one stored record
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CacheArbiter`] | Resolve/commit engine owning indexes and registry |
//! | [`CacheArbiterBuilder`] | Wires policy, embedder, index and store |
//! | [`CachePolicy`] | Similarity threshold, duration tolerance, top-k |
//! | [`ArbiterStats`] | Atomic counter snapshot with `hit_ratio()` |
//!
//! ## Example
//!
//! ```rust,no_run
//! use gencache_rust::arbiter::CacheArbiter;
//! use gencache_rust::types::{AssetType, CacheOutcome};
//!
//! # async fn demo() -> gencache_rust::Result<()> {
//! let cache = CacheArbiter::builder().build()?;
//! match cache.resolve("calm ocean waves", 120, AssetType::Music).await? {
//!     CacheOutcome::Hit(record) => println!("reuse {}", record.location_ref),
//!     CacheOutcome::Miss(fingerprint) => {
//!         // generate + upload externally, then:
//!         cache
//!             .commit(fingerprint, 120, AssetType::Music, "s3://media/new.mp3")
//!             .await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod engine;
mod policy;
mod stats;

pub use engine::{CacheArbiter, CacheArbiterBuilder};
pub use policy::{
    CachePolicy, DEFAULT_DURATION_TOLERANCE_SECS, DEFAULT_MATCH_COUNT,
    DEFAULT_SIMILARITY_THRESHOLD,
};
pub use stats::ArbiterStats;
