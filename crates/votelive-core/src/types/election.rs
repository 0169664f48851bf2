//! Election and vote projections as they appear on the wire.
//!
//! Field names are camelCase and timestamps are epoch seconds, matching
//! what the web clients already consume from the CRUD backend.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Lifecycle state of a single vote, serialized as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum VoteState {
    /// Created, not yet open.
    Ready,
    /// Open for ballots.
    Voting,
    /// Closed to ballots.
    Finished,
    /// Tally in progress.
    Counting,
    /// Tally published.
    Completed,
}

impl From<VoteState> for u8 {
    fn from(state: VoteState) -> u8 {
        match state {
            VoteState::Ready => 0,
            VoteState::Voting => 1,
            VoteState::Finished => 2,
            VoteState::Counting => 3,
            VoteState::Completed => 4,
        }
    }
}

impl TryFrom<u8> for VoteState {
    type Error = AppError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Ready),
            1 => Ok(Self::Voting),
            2 => Ok(Self::Finished),
            3 => Ok(Self::Counting),
            4 => Ok(Self::Completed),
            other => Err(AppError::validation(format!("Unknown vote state: {other}"))),
        }
    }
}

/// A candidate on a ballot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateInfo {
    /// Candidate id.
    pub cadt_id: String,
    /// Display name.
    pub name: String,
    /// Ballot position, 1-based.
    pub number: u32,
}

/// A candidate with its tallied count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateTally {
    /// Candidate id.
    pub cadt_id: String,
    /// Display name.
    pub name: String,
    /// Ballot position, 1-based.
    pub number: u32,
    /// Ballots counted for this candidate.
    pub count: u64,
}

/// Published result of a finished vote.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResult {
    /// Eligible voters.
    pub voter_count: u64,
    /// Ballots cast.
    pub voted_count: u64,
    /// Per-candidate tallies.
    pub candidates: Vec<CandidateTally>,
}

/// One vote inside the election-with-votes projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteInfo {
    /// Vote id.
    pub vote_id: String,
    /// Vote title.
    pub title: String,
    /// Current lifecycle state.
    pub state: VoteState,
    /// Creation time, epoch seconds.
    pub created_at: i64,
    /// Eligible voters.
    pub voter_count: u64,
    /// Ballots cast so far.
    pub voted_count: u64,
    /// Candidates on the ballot.
    pub candidates: Vec<CandidateInfo>,
    /// Published result, once available.
    pub result: Option<VoteResult>,
}

/// The full projection pushed in `election.update` events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionWithVotes {
    /// Election id.
    pub elec_id: String,
    /// Election title.
    pub title: String,
    /// Creation time, epoch seconds.
    pub created_at: i64,
    /// Votes belonging to this election.
    pub votes: Vec<VoteInfo>,
}

/// Per-vote snapshot pushed in `votes.update.status` events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStatus {
    /// Vote id.
    pub vote_id: String,
    /// Current lifecycle state.
    pub state: VoteState,
    /// Eligible voters.
    pub voter_count: u64,
    /// Ballots cast so far.
    pub voted_count: u64,
    /// Published result, once available.
    pub result: Option<VoteResult>,
}
