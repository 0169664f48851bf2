//! JWT decoding for VoteLive realtime sessions.
//!
//! Two token families flow into the gateway as cookies: manager access
//! tokens and per-election voter tokens. Both are HS256 but signed with
//! independent secrets.

pub mod decoder;

pub use decoder::{AccessTokenDecoder, VoteTokenDecoder};
