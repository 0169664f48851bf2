//! Session record types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use votelive_core::types::{AccessTokenClaims, VoterTokenClaims};

/// Outcome of the most recent handshake attempt on a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandshakeStatus {
    /// No handshake completed yet.
    Idle,
    /// Handshake succeeded; identity fields are populated.
    Success,
    /// Reserved for future use; failed handshakes leave the record idle.
    Failed,
}

/// One live connection's authentication and election context.
///
/// At most one of `access_token` and `voter_token` is set: a connection is
/// exactly one of manager, voter, or viewer once its handshake succeeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    /// Cookie snapshot captured at connect time, immutable afterwards.
    pub cookies: HashMap<String, String>,
    /// Handshake outcome.
    pub handshake_status: HandshakeStatus,
    /// View id, viewer connections only.
    pub view_id: Option<String>,
    /// Election this connection is scoped to.
    pub elec_id: Option<String>,
    /// Decoded manager claims, manager connections only.
    pub access_token: Option<AccessTokenClaims>,
    /// Decoded voter claims, voter connections only.
    pub voter_token: Option<VoterTokenClaims>,
}

impl SessionData {
    /// A fresh unauthenticated session holding only the cookie snapshot.
    pub fn idle(cookies: HashMap<String, String>) -> Self {
        Self {
            cookies,
            handshake_status: HandshakeStatus::Idle,
            view_id: None,
            elec_id: None,
            access_token: None,
            voter_token: None,
        }
    }
}
