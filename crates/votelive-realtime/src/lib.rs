//! Realtime session and event-fanout engine for VoteLive.
//!
//! Tracks every live connection (manager, voter, viewer), binds each to an
//! authenticated identity and an election, and pushes election and vote
//! state changes to the affected connections. All authoritative state lives
//! in the shared key/value store, so any number of gateway instances can
//! serve the same elections.

pub mod fanout;
pub mod gateway;
pub mod presence;
pub mod protocol;
pub mod server;
pub mod session;

pub use server::RealtimeHub;
