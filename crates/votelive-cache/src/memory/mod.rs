//! In-process memory store provider for single-node deployments and tests.

pub mod store;

pub use store::MemoryKvStore;
