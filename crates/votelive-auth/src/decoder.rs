//! JWT token validation.
//!
//! Handshake processing treats a bad token as an authentication outcome
//! rather than a fault, so both decoders map every validation failure
//! (expired, malformed, wrong signature) to `Ok(None)` and reserve `Err`
//! for conditions that should abort the handshake outright.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use votelive_core::config::AuthConfig;
use votelive_core::result::AppResult;
use votelive_core::traits::{ManagerTokenDecoder, VoterTokenDecoder};
use votelive_core::types::{AccessTokenClaims, VoterTokenClaims};

/// Validates manager access tokens.
#[derive(Clone)]
pub struct AccessTokenDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for AccessTokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl AccessTokenDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation: standard_validation(config.leeway_seconds),
        }
    }
}

#[async_trait]
impl ManagerTokenDecoder for AccessTokenDecoder {
    async fn decode_access_token(&self, token: &str) -> AppResult<Option<AccessTokenClaims>> {
        match decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(Some(data.claims)),
            Err(e) => {
                tracing::debug!(error = %e, "access token rejected");
                Ok(None)
            }
        }
    }
}

/// Validates per-election voter tokens.
#[derive(Clone)]
pub struct VoteTokenDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for VoteTokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoteTokenDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl VoteTokenDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.vote_jwt_secret.as_bytes()),
            validation: standard_validation(config.leeway_seconds),
        }
    }
}

#[async_trait]
impl VoterTokenDecoder for VoteTokenDecoder {
    async fn decode_vote_token(&self, token: &str) -> AppResult<Option<VoterTokenClaims>> {
        match decode::<VoterTokenClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(Some(data.claims)),
            Err(e) => {
                tracing::debug!(error = %e, "vote token rejected");
                Ok(None)
            }
        }
    }
}

fn standard_validation(leeway_seconds: u64) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = leeway_seconds;
    validation
}
