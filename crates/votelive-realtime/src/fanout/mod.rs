//! Pushing domain changes to every addressed connection.

pub mod bridge;
pub mod engine;

pub use bridge::RedisEventBridge;
pub use engine::FanoutEngine;
