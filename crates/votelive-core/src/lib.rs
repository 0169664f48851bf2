//! # votelive-core
//!
//! Shared foundation for the VoteLive realtime node:
//!
//! - Unified [`error::AppError`] / [`result::AppResult`] error handling
//! - Configuration schemas loaded from TOML + environment
//! - The key/value store adapter contract ([`traits::kv::KvStore`])
//! - Collaborator seams for token decoding and election/view reads
//! - Wire projection types and domain events

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;
