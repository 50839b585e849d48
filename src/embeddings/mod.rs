//! Embedding support for prompt fingerprinting.
//!
//! This module provides:
//! - The [`Embedder`] trait with a deterministic offline [`HashEmbedder`]
//! - An HTTP client for OpenAI-compatible embedding endpoints
//! - Vector operations (cosine similarity, normalization)

#[cfg(feature = "http-embedder")]
mod client;
mod provider;
mod vectors;

#[cfg(feature = "http-embedder")]
pub use client::{HttpEmbedder, HttpEmbedderBuilder};
pub use provider::{Embedder, HashEmbedder, DEFAULT_DIMENSIONS};
pub use vectors::{cosine_similarity, dot_product, magnitude, normalize_vector, Vector};
