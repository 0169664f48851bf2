//! VoteLive realtime gateway server.
//!
//! HTTP surface over the realtime engine: the WebSocket upgrade endpoint
//! for self-hosted deployments and the lifecycle webhooks for managed ones.

pub mod hooks;
pub mod router;
pub mod state;
pub mod ws;

pub use router::build_router;
pub use state::AppState;
