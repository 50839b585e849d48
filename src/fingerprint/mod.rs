//! 请求指纹模块：提示词规范化、规范键派生与嵌入向量计算。
//!
//! # Fingerprint Module
//!
//! Derives the deterministic identity of every generation request before
//! any cache index is consulted.
//!
//! ## Overview
//!
//! A fingerprint is built in three steps:
//! - **Normalize**: lowercase, trim, collapse whitespace, strip punctuation
//! - **Key**: SHA-256 over the (prompt, duration, asset type) triple
//! - **Embed**: vectorize the normalized prompt, bounded by a timeout
//!
//! Normalization and key derivation are pure functions; embedding is the
//! only fallible external step and degrades cleanly when the provider is
//! unreachable.
//!
//! ## Example
//!
//! ```rust
//! use gencache_rust::fingerprint::normalize_prompt;
//!
//! assert_eq!(
//!     normalize_prompt("  Calm ocean waves,\nsoft PIANO!  "),
//!     "calm ocean waves soft piano"
//! );
//! ```

mod fingerprinter;
mod key;
mod normalize;

pub use fingerprinter::{
    Fingerprinter, DEFAULT_EMBED_TIMEOUT, DEFAULT_MAX_DURATION_SECS, DEFAULT_MIN_DURATION_SECS,
};
pub use key::canonical_key;
pub use normalize::normalize_prompt;
