//! Election presence derived from key existence in the shared store.

pub mod index;

pub use index::PresenceIndex;
