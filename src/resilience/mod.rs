//! 弹性模式模块：嵌入服务的熔断保护。
//!
//! # Resilience Module
//!
//! Failure isolation for the one external dependency resolution has: the
//! embedding provider. The cache never hard-fails when embeddings are
//! unreachable; it degrades to exact-key matching, and the breaker keeps
//! a flapping provider from adding per-request timeout latency while it
//! is down.
//!
//! ## Circuit Breaker
//!
//! - **Closed**: embedding calls pass through
//! - **Open**: failures exceeded the threshold; calls fail fast as
//!   `EmbeddingUnavailable` until the cooldown elapses
//!
//! ```rust
//! use gencache_rust::resilience::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
//! use std::time::Duration;
//!
//! let config = CircuitBreakerConfig::new()
//!     .with_failure_threshold(5)
//!     .with_cooldown(Duration::from_secs(30));
//! let breaker = CircuitBreaker::new(config);
//!
//! if breaker.allow().is_ok() {
//!     // Call the embedding provider...
//!     breaker.on_success();
//! }
//! ```

pub mod circuit_breaker;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerSnapshot};
