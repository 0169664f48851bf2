//! Trait definitions shared across VoteLive crates.

pub mod auth;
pub mod directory;
pub mod kv;

pub use auth::{ManagerTokenDecoder, VoterTokenDecoder};
pub use directory::{ElectionDirectory, ViewDirectory};
pub use kv::KvStore;
