//! Event fanout over the presence index.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use votelive_core::result::AppResult;
use votelive_core::traits::ElectionDirectory;

use crate::gateway::TransportGateway;
use crate::presence::PresenceIndex;
use crate::protocol::OutboundEvent;

/// Resolves the connections affected by a domain change and pushes the
/// serialized event to each.
pub struct FanoutEngine {
    presence: PresenceIndex,
    gateway: Arc<dyn TransportGateway>,
    elections: Arc<dyn ElectionDirectory>,
}

impl std::fmt::Debug for FanoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutEngine").finish_non_exhaustive()
    }
}

impl FanoutEngine {
    pub fn new(
        presence: PresenceIndex,
        gateway: Arc<dyn TransportGateway>,
        elections: Arc<dyn ElectionDirectory>,
    ) -> Self {
        Self {
            presence,
            gateway,
            elections,
        }
    }

    /// Pushes a fresh `election.update` projection to every voter and
    /// viewer connection of the election.
    ///
    /// Delivery is best-effort and unordered; a recipient whose send fails
    /// is skipped and logged, never retried here. Its presence marker dies
    /// with the session lease.
    pub async fn election_updated(&self, elec_id: &str) -> AppResult<u64> {
        let projection = self.elections.election_info(elec_id).await?;
        let frame = serde_json::to_string(&OutboundEvent::ElectionUpdate(projection))?;

        let mut recipients: HashSet<String> = HashSet::new();
        recipients.extend(self.presence.list_voter_connections(elec_id).await?);
        recipients.extend(self.presence.list_viewer_connections(elec_id).await?);

        let mut delivered = 0u64;
        for connection_id in &recipients {
            match self.gateway.send(connection_id, &frame).await {
                Ok(()) => delivered += 1,
                Err(e) if e.is_no_connection() => {
                    debug!(connection_id, elec_id, "skipping gone connection");
                }
                Err(e) => {
                    warn!(connection_id, elec_id, error = %e, "fanout delivery failed");
                }
            }
        }

        debug!(
            elec_id,
            recipients = recipients.len(),
            delivered,
            "election update fanned out"
        );
        Ok(delivered)
    }

    /// Hook point for per-vote fanout; no subscriber needs it yet.
    pub async fn vote_updated(&self, vote_id: &str) -> AppResult<()> {
        debug!(vote_id, "vote update received, no per-vote fanout configured");
        Ok(())
    }
}
