//! Shared wire-level types.

pub mod claims;
pub mod election;

pub use claims::{AccessTokenClaims, VoterTokenClaims};
pub use election::{CandidateInfo, CandidateTally, ElectionWithVotes, VoteInfo, VoteResult, VoteState, VoteStatus};
