//! Read seams into the election-management backend.
//!
//! The relational store belongs to the CRUD backend; the realtime node
//! fetches projections through these traits only.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::election::{ElectionWithVotes, VoteStatus};

/// Read access to election and vote projections.
#[async_trait]
pub trait ElectionDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Full election-with-votes projection, as pushed in `election.update`.
    async fn election_info(&self, elec_id: &str) -> AppResult<ElectionWithVotes>;

    /// Per-vote state snapshot, as pushed in `votes.update.status`.
    async fn vote_status(&self, vote_id: &str) -> AppResult<VoteStatus>;
}

/// Resolves viewer links to their owning election.
#[async_trait]
pub trait ViewDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// The election a view id belongs to, or `None` for an unknown view.
    async fn election_for_view(&self, view_id: &str) -> AppResult<Option<String>>;
}
