//! Token-decoding collaborator seams.
//!
//! Token issuance and verification internals are outside the realtime
//! node; it only needs "decode token → claims or nothing". A token that
//! fails verification (expired, garbage, wrong signature) decodes to
//! `Ok(None)` — that is a handshake failure reported to the client, not
//! an engine error.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::claims::{AccessTokenClaims, VoterTokenClaims};

/// Decodes manager access tokens.
#[async_trait]
pub trait ManagerTokenDecoder: Send + Sync + std::fmt::Debug + 'static {
    /// Decode and verify an access token string.
    async fn decode_access_token(&self, token: &str) -> AppResult<Option<AccessTokenClaims>>;
}

/// Decodes voter vote tokens.
#[async_trait]
pub trait VoterTokenDecoder: Send + Sync + std::fmt::Debug + 'static {
    /// Decode and verify a vote token string.
    async fn decode_vote_token(&self, token: &str) -> AppResult<Option<VoterTokenClaims>>;
}
