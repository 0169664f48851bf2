//! Domain change notifications consumed by the fanout engine.
//!
//! The CRUD backend publishes these whenever election or vote state
//! changes; the realtime node turns them into pushes to every affected
//! connection. The enum is closed on purpose — adding an event means
//! every consumer's match is checked at compile time.

use serde::{Deserialize, Serialize};

/// A domain-level change notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// An election or one of its votes changed shape (votes added,
    /// started, stopped, results published).
    ElectionUpdated {
        /// The affected election.
        elec_id: String,
    },
    /// A single vote's cached state changed. Currently a hook point for
    /// future per-vote fanout.
    VoteUpdated {
        /// The affected vote.
        vote_id: String,
    },
}
