//! Decoded token claim sets stored on authenticated sessions.

use serde::{Deserialize, Serialize};

/// Claims carried by a manager access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenClaims {
    /// Subject — the manager's user id.
    pub sub: String,
    /// Organization the manager belongs to.
    #[serde(default)]
    pub org_id: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Expiry, epoch seconds.
    pub exp: i64,
}

/// Claims carried by a voter vote token. Always scoped to one election.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterTokenClaims {
    /// Election this token grants access to.
    pub elec_id: String,
    /// Voter identity within that election.
    pub voter_id: String,
    /// Expiry, epoch seconds.
    pub exp: i64,
}
