//! Per-connection session records.

pub mod store;
pub mod types;

pub use store::SessionStore;
pub use types::{HandshakeStatus, SessionData};
