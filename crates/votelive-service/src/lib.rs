//! Backend clients for the VoteLive realtime gateway.
//!
//! The gateway is not the system of record. Election and view data live in
//! the main VoteLive backend and are fetched over HTTP, with hot fields
//! (election titles, vote state, voted-voter sets) read through the shared
//! key/value store that the vote-processing service also writes.

pub mod cache_util;
pub mod election;
pub mod view;

pub use election::ElectionClient;
pub use view::ViewClient;
