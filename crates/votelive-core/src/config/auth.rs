//! Token verification configuration.
//!
//! Cookie names are deployment constants, not protocol constants; they
//! default to the names the VoteLive web frontends set.

use serde::{Deserialize, Serialize};

/// Settings for decoding the identity cookies presented at connect time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Cookie carrying the manager access token.
    #[serde(default = "default_access_token_cookie")]
    pub access_token_cookie: String,
    /// Cookie carrying the voter vote token.
    #[serde(default = "default_vote_token_cookie")]
    pub vote_token_cookie: String,
    /// HMAC secret used to verify manager access tokens.
    #[serde(default = "default_secret")]
    pub jwt_secret: String,
    /// HMAC secret used to verify voter vote tokens.
    #[serde(default = "default_secret")]
    pub vote_jwt_secret: String,
    /// Clock-skew leeway applied during token validation, in seconds.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_cookie: default_access_token_cookie(),
            vote_token_cookie: default_vote_token_cookie(),
            jwt_secret: default_secret(),
            vote_jwt_secret: default_secret(),
            leeway_seconds: default_leeway(),
        }
    }
}

fn default_access_token_cookie() -> String {
    "access_token".to_string()
}

fn default_vote_token_cookie() -> String {
    "vote_token".to_string()
}

fn default_secret() -> String {
    "insecure-dev-secret".to_string()
}

fn default_leeway() -> u64 {
    5
}
