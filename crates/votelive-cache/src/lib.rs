//! # votelive-cache
//!
//! Key/value store providers for VoteLive. Supports two modes:
//!
//! - **memory**: In-process store on [dashmap](https://crates.io/crates/dashmap)
//!   with explicit per-key deadlines (tests, single-node development)
//! - **redis**: Redis-backed store using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime based on configuration. Keys are
//! built exclusively through [`keys`] — the colon-delimited layout is
//! positional and scanned, so it must never vary per call site.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::KvManager;
