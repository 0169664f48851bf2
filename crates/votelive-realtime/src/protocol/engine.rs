//! Handshake and message-dispatch state machine.
//!
//! One engine instance serves every connection. A connection moves through
//! connecting (cookie check, idle session written), unauthenticated, then
//! one of manager/voter/viewer after a successful `handshake.request`.
//! Processing errors are a connection's own problem: the session is torn
//! down and the transport told to close, and no other connection notices.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use votelive_core::config::AuthConfig;
use votelive_core::result::AppResult;
use votelive_core::traits::{
    ElectionDirectory, ManagerTokenDecoder, ViewDirectory, VoterTokenDecoder,
};
use votelive_core::types::VoteStatus;

use crate::gateway::TransportGateway;
use crate::presence::PresenceIndex;
use crate::session::{HandshakeStatus, SessionData, SessionStore};

use super::cookies::parse_cookie_header;
use super::events::{HandshakeMode, InboundEvent, OutboundEvent};

/// Why a connect attempt was denied before upgrade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectRejection {
    /// HTTP-style status for the denial.
    pub status_code: u16,
    /// Operator-facing reason, not sent to the client.
    pub reason: String,
}

impl ConnectRejection {
    fn unauthorized(reason: impl Into<String>) -> Self {
        Self {
            status_code: 401,
            reason: reason.into(),
        }
    }

    fn internal(reason: impl Into<String>) -> Self {
        Self {
            status_code: 500,
            reason: reason.into(),
        }
    }
}

/// Drives session lifecycle for every connection on this instance.
pub struct ProtocolEngine {
    sessions: Arc<SessionStore>,
    presence: PresenceIndex,
    gateway: Arc<dyn TransportGateway>,
    manager_tokens: Arc<dyn ManagerTokenDecoder>,
    voter_tokens: Arc<dyn VoterTokenDecoder>,
    elections: Arc<dyn ElectionDirectory>,
    views: Arc<dyn ViewDirectory>,
    auth: AuthConfig,
}

impl std::fmt::Debug for ProtocolEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtocolEngine").finish_non_exhaustive()
    }
}

impl ProtocolEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sessions: Arc<SessionStore>,
        presence: PresenceIndex,
        gateway: Arc<dyn TransportGateway>,
        manager_tokens: Arc<dyn ManagerTokenDecoder>,
        voter_tokens: Arc<dyn VoterTokenDecoder>,
        elections: Arc<dyn ElectionDirectory>,
        views: Arc<dyn ViewDirectory>,
        auth: AuthConfig,
    ) -> Self {
        Self {
            sessions,
            presence,
            gateway,
            manager_tokens,
            voter_tokens,
            elections,
            views,
            auth,
        }
    }

    /// Accepts or rejects a raw connection before upgrade.
    ///
    /// A cookie jar must be present; an idle session is written under the
    /// connection id before any frame is processed.
    pub async fn on_connect(
        &self,
        connection_id: &str,
        headers: &HashMap<String, String>,
    ) -> Result<(), ConnectRejection> {
        let cookies = parse_cookie_header(headers)
            .ok_or_else(|| ConnectRejection::unauthorized("Missing or unparseable cookies"))?;

        self.sessions
            .create(connection_id, cookies)
            .await
            .map_err(|e| {
                warn!(connection_id, error = %e, "session create failed at connect");
                ConnectRejection::internal(format!("Session create failed: {e}"))
            })?;

        debug!(connection_id, "connection accepted");
        Ok(())
    }

    /// Processes one inbound text frame to completion.
    ///
    /// Any error tears the connection down: session and presence deleted,
    /// transport closed. The caller must not feed further frames for this
    /// connection concurrently.
    pub async fn on_message(&self, connection_id: &str, raw: &str) {
        if let Err(e) = self.process(connection_id, raw).await {
            warn!(connection_id, error = %e, "message processing failed, dropping connection");
            self.teardown(connection_id).await;
        }
    }

    /// Transport-driven disconnect. Idempotent.
    pub async fn on_disconnect(&self, connection_id: &str) {
        debug!(connection_id, "disconnected");
        if let Err(e) = self.sessions.delete(connection_id).await {
            warn!(connection_id, error = %e, "session cleanup failed on disconnect");
        }
    }

    async fn teardown(&self, connection_id: &str) {
        if let Err(e) = self.sessions.delete(connection_id).await {
            warn!(connection_id, error = %e, "session cleanup failed");
        }
        if let Err(e) = self.gateway.close(connection_id).await {
            debug!(connection_id, error = %e, "close after teardown failed");
        }
    }

    async fn process(&self, connection_id: &str, raw: &str) -> AppResult<()> {
        let Some(event) = InboundEvent::parse(raw)? else {
            debug!(connection_id, "ignoring unknown event");
            return Ok(());
        };

        match event {
            InboundEvent::HandshakeRequest { mode, view_id } => {
                self.handle_handshake(connection_id, mode, view_id).await
            }
            InboundEvent::Ping => {
                let session = self.sessions.get(connection_id).await?;
                self.sessions.renew(connection_id, &session).await
            }
            InboundEvent::RequestElectionUpdate => {
                let session = self.sessions.get(connection_id).await?;
                // Manager and pre-handshake sessions carry no election
                // scope; the request is dropped, not an error.
                let Some(elec_id) = session.elec_id.as_deref() else {
                    debug!(connection_id, "election update requested without election scope");
                    return Ok(());
                };
                let projection = self.elections.election_info(elec_id).await?;
                self.gateway
                    .send_event(connection_id, &OutboundEvent::ElectionUpdate(projection))
                    .await
            }
            InboundEvent::RequestVotesUpdateStatus { vote_ids } => {
                // Session must still be live even though the payload carries ids.
                self.sessions.get(connection_id).await?;
                let mut statuses: Vec<VoteStatus> = Vec::with_capacity(vote_ids.len());
                for vote_id in &vote_ids {
                    statuses.push(self.elections.vote_status(vote_id).await?);
                }
                self.gateway
                    .send_event(connection_id, &OutboundEvent::VotesUpdateStatus(statuses))
                    .await
            }
            InboundEvent::RequestElectionNowVoterCount { elec_id } => {
                self.sessions.get(connection_id).await?;
                let count = self.presence.count_distinct_voters(&elec_id).await?;
                self.gateway
                    .send_event(
                        connection_id,
                        &OutboundEvent::ElectionNowVoterCount { count },
                    )
                    .await
            }
        }
    }

    /// A failed handshake answers `result:false` and leaves the session as
    /// it was; the client may retry on the same connection.
    async fn handle_handshake(
        &self,
        connection_id: &str,
        mode: Option<HandshakeMode>,
        view_id: Option<String>,
    ) -> AppResult<()> {
        let Some(mode) = mode else {
            info!(connection_id, "handshake refused: unrecognized mode");
            return self
                .gateway
                .send_event(
                    connection_id,
                    &OutboundEvent::handshake_failed("Unknown handshake mode"),
                )
                .await;
        };

        let session = self.sessions.get(connection_id).await?;

        let outcome = match mode {
            HandshakeMode::Manager => self.handshake_manager(connection_id, session).await?,
            HandshakeMode::Voter => self.handshake_voter(connection_id, session).await?,
            HandshakeMode::Viewer => {
                self.handshake_viewer(connection_id, session, view_id).await?
            }
        };

        match outcome {
            Ok(()) => {
                info!(connection_id, ?mode, "handshake succeeded");
                self.gateway
                    .send_event(connection_id, &OutboundEvent::handshake_ok())
                    .await
            }
            Err(message) => {
                info!(connection_id, ?mode, reason = %message, "handshake refused");
                self.gateway
                    .send_event(connection_id, &OutboundEvent::handshake_failed(message))
                    .await
            }
        }
    }

    async fn handshake_manager(
        &self,
        connection_id: &str,
        mut session: SessionData,
    ) -> AppResult<Result<(), String>> {
        let Some(token) = session.cookies.get(&self.auth.access_token_cookie).cloned() else {
            return Ok(Err("Missing access token".to_string()));
        };
        let Some(claims) = self.manager_tokens.decode_access_token(&token).await? else {
            return Ok(Err("Invalid access token".to_string()));
        };

        session.access_token = Some(claims);
        session.handshake_status = HandshakeStatus::Success;
        self.sessions.update(connection_id, &session).await?;
        Ok(Ok(()))
    }

    async fn handshake_voter(
        &self,
        connection_id: &str,
        mut session: SessionData,
    ) -> AppResult<Result<(), String>> {
        let Some(token) = session.cookies.get(&self.auth.vote_token_cookie).cloned() else {
            return Ok(Err("Missing vote token".to_string()));
        };
        let Some(claims) = self.voter_tokens.decode_vote_token(&token).await? else {
            return Ok(Err("Invalid vote token".to_string()));
        };

        session.elec_id = Some(claims.elec_id.clone());
        session.voter_token = Some(claims.clone());
        session.handshake_status = HandshakeStatus::Success;
        self.sessions.update(connection_id, &session).await?;
        self.presence
            .mark_voter_present(&claims.elec_id, &claims.voter_id, connection_id)
            .await?;
        Ok(Ok(()))
    }

    async fn handshake_viewer(
        &self,
        connection_id: &str,
        mut session: SessionData,
        view_id: Option<String>,
    ) -> AppResult<Result<(), String>> {
        let Some(view_id) = view_id else {
            return Ok(Err("Missing view id".to_string()));
        };
        let Some(elec_id) = self.views.election_for_view(&view_id).await? else {
            return Ok(Err("Unknown view".to_string()));
        };

        session.view_id = Some(view_id);
        session.elec_id = Some(elec_id.clone());
        session.handshake_status = HandshakeStatus::Success;
        self.sessions.update(connection_id, &session).await?;
        self.presence
            .mark_viewer_present(&elec_id, connection_id)
            .await?;
        Ok(Ok(()))
    }
}
