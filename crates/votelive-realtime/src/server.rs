//! Top-level realtime hub that ties together all subsystems.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use votelive_core::config::{AuthConfig, RealtimeConfig};
use votelive_core::traits::{
    ElectionDirectory, KvStore, ManagerTokenDecoder, ViewDirectory, VoterTokenDecoder,
};

use crate::fanout::FanoutEngine;
use crate::gateway::TransportGateway;
use crate::presence::PresenceIndex;
use crate::protocol::ProtocolEngine;
use crate::session::SessionStore;

/// External collaborators the hub depends on, injected at startup.
pub struct Collaborators {
    pub manager_tokens: Arc<dyn ManagerTokenDecoder>,
    pub voter_tokens: Arc<dyn VoterTokenDecoder>,
    pub elections: Arc<dyn ElectionDirectory>,
    pub views: Arc<dyn ViewDirectory>,
}

/// Central realtime engine coordinating sessions, presence, protocol
/// dispatch, and fanout over one transport gateway.
#[derive(Clone)]
pub struct RealtimeHub {
    /// Session store.
    pub sessions: Arc<SessionStore>,
    /// Presence index.
    pub presence: PresenceIndex,
    /// Transport gateway.
    pub gateway: Arc<dyn TransportGateway>,
    /// Handshake and dispatch engine.
    pub engine: Arc<ProtocolEngine>,
    /// Fanout engine.
    pub fanout: Arc<FanoutEngine>,
}

impl std::fmt::Debug for RealtimeHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeHub").finish()
    }
}

impl RealtimeHub {
    /// Wires up all subsystems over the given store, gateway, and
    /// collaborators.
    pub fn new(
        config: &RealtimeConfig,
        auth: AuthConfig,
        kv: Arc<dyn KvStore>,
        gateway: Arc<dyn TransportGateway>,
        collaborators: Collaborators,
    ) -> Self {
        let ttl = Duration::from_secs(config.session_ttl_seconds);
        let presence = PresenceIndex::new(kv.clone(), ttl);
        let sessions = Arc::new(SessionStore::new(kv, presence.clone(), ttl));

        let engine = Arc::new(ProtocolEngine::new(
            sessions.clone(),
            presence.clone(),
            gateway.clone(),
            collaborators.manager_tokens,
            collaborators.voter_tokens,
            collaborators.elections.clone(),
            collaborators.views,
            auth,
        ));
        let fanout = Arc::new(FanoutEngine::new(
            presence.clone(),
            gateway.clone(),
            collaborators.elections,
        ));

        info!(
            session_ttl_seconds = config.session_ttl_seconds,
            "realtime hub initialized"
        );

        Self {
            sessions,
            presence,
            gateway,
            engine,
            fanout,
        }
    }
}
