//! Wire event definitions.
//!
//! Frames are JSON `{event, data}` envelopes in both directions. Inbound
//! names form a closed set; an unknown name parses to `None` so the engine
//! can ignore it, while a known name with a malformed payload is an error.
//! Handshake payloads are the exception: a bad one degrades to an
//! unrecognized mode so the engine can refuse it over the wire.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use votelive_core::error::AppError;
use votelive_core::result::AppResult;
use votelive_core::types::{ElectionWithVotes, VoteStatus};

/// Handshake role discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeMode {
    Manager,
    Voter,
    Viewer,
}

impl HandshakeMode {
    /// `None` for a mode string outside the closed role set.
    pub fn from_wire(mode: &str) -> Option<Self> {
        match mode {
            "manager" => Some(Self::Manager),
            "voter" => Some(Self::Voter),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HandshakePayload {
    mode: String,
    #[serde(default)]
    view_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VoteIdsPayload {
    vote_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ElecIdPayload {
    elec_id: String,
}

/// Events clients send to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// `handshake.request`: upgrade this connection to a role. `mode` is
    /// `None` when the payload is missing, malformed, or names a role
    /// outside the closed set; the engine answers those with a refusal.
    HandshakeRequest {
        mode: Option<HandshakeMode>,
        view_id: Option<String>,
    },
    /// `ping`: renew the session lease.
    Ping,
    /// `request.election.update`: ask for the full election projection.
    RequestElectionUpdate,
    /// `request.votes.update.status`: ask for per-vote snapshots.
    RequestVotesUpdateStatus { vote_ids: Vec<String> },
    /// `request.election.now.voter.count`: ask for the live voter count.
    RequestElectionNowVoterCount { elec_id: String },
}

impl InboundEvent {
    /// Parses a raw text frame.
    ///
    /// `Ok(None)` means the event name is not one of ours.
    pub fn parse(raw: &str) -> AppResult<Option<Self>> {
        let envelope: Envelope = serde_json::from_str(raw)?;
        let event = match envelope.event.as_str() {
            "handshake.request" => {
                // A broken handshake payload is refused over the wire, not
                // treated as a protocol error.
                match envelope
                    .data
                    .and_then(|data| serde_json::from_value::<HandshakePayload>(data).ok())
                {
                    Some(payload) => Self::HandshakeRequest {
                        mode: HandshakeMode::from_wire(&payload.mode),
                        view_id: payload.view_id,
                    },
                    None => Self::HandshakeRequest {
                        mode: None,
                        view_id: None,
                    },
                }
            }
            "ping" => Self::Ping,
            "request.election.update" => Self::RequestElectionUpdate,
            "request.votes.update.status" => {
                let payload: VoteIdsPayload =
                    payload_of(envelope.data, "request.votes.update.status")?;
                Self::RequestVotesUpdateStatus {
                    vote_ids: payload.vote_ids,
                }
            }
            "request.election.now.voter.count" => {
                let payload: ElecIdPayload =
                    payload_of(envelope.data, "request.election.now.voter.count")?;
                Self::RequestElectionNowVoterCount {
                    elec_id: payload.elec_id,
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(event))
    }
}

fn payload_of<T: serde::de::DeserializeOwned>(data: Option<Value>, event: &str) -> AppResult<T> {
    let data =
        data.ok_or_else(|| AppError::validation(format!("Missing payload for {event}")))?;
    serde_json::from_value(data)
        .map_err(|e| AppError::validation(format!("Bad payload for {event}: {e}")))
}

/// Events the gateway pushes to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum OutboundEvent {
    /// Handshake outcome.
    #[serde(rename = "handshake.response")]
    HandshakeResponse { result: bool, message: String },
    /// Full election-with-votes projection.
    #[serde(rename = "election.update")]
    ElectionUpdate(ElectionWithVotes),
    /// Per-vote state snapshots.
    #[serde(rename = "votes.update.status")]
    VotesUpdateStatus(Vec<VoteStatus>),
    /// Live distinct-voter count.
    #[serde(rename = "election.now.voter.count")]
    ElectionNowVoterCount { count: u64 },
}

impl OutboundEvent {
    pub fn handshake_ok() -> Self {
        Self::HandshakeResponse {
            result: true,
            message: "OK".to_string(),
        }
    }

    pub fn handshake_failed(message: impl Into<String>) -> Self {
        Self::HandshakeResponse {
            result: false,
            message: message.into(),
        }
    }
}
