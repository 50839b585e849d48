//! 索引模块：精确键索引与向量相似度索引。
//!
//! # Index Module
//!
//! The two lookup structures behind cache resolution:
//!
//! - [`ExactIndex`] answers "have we cached exactly this request before"
//!   by canonical key, and its compare-and-insert is the point where
//!   concurrent commits for one key are serialized
//! - [`SimilarityIndex`] answers "have we cached something close enough",
//!   with [`ScanIndex`] as the default exact-scan implementation over
//!   copy-on-write snapshots
//!
//! Both indexes are partition-aware: similarity candidates never cross
//! asset types, and the exact key already encodes the asset type.

mod exact;
mod similarity;

pub use exact::ExactIndex;
pub use similarity::{ScanIndex, SimilarityIndex};
