//! 类型系统模块：缓存记录、指纹与解析结果的核心数据类型。
//!
//! # Types Module
//!
//! This module defines the core data types shared by every layer of the
//! cache, from request fingerprinting through index lookups to commits.
//!
//! ## Overview
//!
//! The type system ensures:
//! - Asset-type partitioning is enforced at the type level
//! - Usage counters stay race-free through shared `Arc`s
//! - Miss outcomes carry everything a later commit needs
//! - Serialization compatibility for persistence and transport
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`AssetType`] | Media kind (`music` / `video`), hard partition for matching |
//! | [`ArtifactRecord`] | Committed artifact with key, embedding and usage counter |
//! | [`Fingerprint`] | Canonical key plus embedding for one request |
//! | [`CacheOutcome`] | `Hit(record)` or `Miss(fingerprint)` |
//! | [`CommitOutcome`] | `Created` or `AlreadyCached` after a commit |
//! | [`SearchHit`] | Similarity candidate with its cosine score |
//!
//! ## Example
//!
//! ```rust
//! use gencache_rust::types::{ArtifactRecord, AssetType};
//!
//! let record = ArtifactRecord::new(
//!     AssetType::Music,
//!     "Calm ocean waves",
//!     "calm ocean waves",
//!     120,
//!     None,
//!     "3f2a9bd0",
//!     "s3://media/track.mp3",
//! );
//! assert_eq!(record.usage(), 0);
//! assert_eq!(record.asset_type, AssetType::Music);
//! ```

pub mod asset;
pub mod outcome;
pub mod record;

pub use asset::AssetType;
pub use outcome::{CacheOutcome, CommitOutcome, Fingerprint, SearchHit};
pub use record::ArtifactRecord;
