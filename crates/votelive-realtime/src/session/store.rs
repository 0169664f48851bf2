//! Session store over the shared key/value store.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use votelive_cache::keys;
use votelive_core::error::AppError;
use votelive_core::result::AppResult;
use votelive_core::traits::KvStore;

use crate::presence::PresenceIndex;

use super::types::SessionData;

/// CRUD over per-connection session records.
///
/// Sessions and their presence markers share one TTL and are renewed
/// together, so a presence entry can never outlive its session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Shared key/value store.
    kv: Arc<dyn KvStore>,
    /// Presence index renewed and cleaned alongside sessions.
    presence: PresenceIndex,
    /// Session lease.
    ttl: Duration,
}

impl SessionStore {
    /// Creates a session store with the given lease duration.
    pub fn new(kv: Arc<dyn KvStore>, presence: PresenceIndex, ttl: Duration) -> Self {
        Self { kv, presence, ttl }
    }

    /// Writes a fresh idle session for a newly accepted connection.
    pub async fn create(
        &self,
        connection_id: &str,
        cookies: HashMap<String, String>,
    ) -> AppResult<SessionData> {
        let session = SessionData::idle(cookies);
        self.write(connection_id, &session).await?;
        Ok(session)
    }

    /// Loads the session for a connection.
    ///
    /// An absent or expired record is a session error; callers treat it as
    /// "this connection is stale" and terminate it.
    pub async fn get(&self, connection_id: &str) -> AppResult<SessionData> {
        let raw = self
            .kv
            .get(&keys::ws_session(connection_id))
            .await?
            .ok_or_else(|| {
                AppError::session(format!("No session for connection {connection_id}"))
            })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Resets the session lease and any presence markers to a full TTL.
    pub async fn renew(&self, connection_id: &str, session: &SessionData) -> AppResult<()> {
        self.kv
            .expire(&keys::ws_session(connection_id), self.ttl)
            .await?;
        self.refresh_presence(connection_id, session).await
    }

    /// Overwrites the session content and resets the lease.
    pub async fn update(&self, connection_id: &str, session: &SessionData) -> AppResult<()> {
        self.write(connection_id, session).await
    }

    /// Removes the session and any presence markers it implies. Idempotent.
    pub async fn delete(&self, connection_id: &str) -> AppResult<()> {
        // Presence keys are recovered from the session content, so the
        // session must be read before its record is removed.
        match self.get(connection_id).await {
            Ok(session) => self.remove_presence(connection_id, &session).await?,
            Err(e) if e.is_no_session() => {}
            Err(e) => return Err(e),
        }
        self.kv.delete(&keys::ws_session(connection_id)).await
    }

    /// Registers a voter connection's presence marker.
    pub async fn mark_voter_present(
        &self,
        elec_id: &str,
        voter_id: &str,
        connection_id: &str,
    ) -> AppResult<()> {
        self.presence
            .mark_voter_present(elec_id, voter_id, connection_id)
            .await
    }

    /// Registers a viewer connection's presence marker.
    pub async fn mark_viewer_present(&self, elec_id: &str, connection_id: &str) -> AppResult<()> {
        self.presence
            .mark_viewer_present(elec_id, connection_id)
            .await
    }

    async fn write(&self, connection_id: &str, session: &SessionData) -> AppResult<()> {
        let raw = serde_json::to_string(session)?;
        self.kv
            .set(&keys::ws_session(connection_id), &raw, self.ttl)
            .await
    }

    async fn refresh_presence(&self, connection_id: &str, session: &SessionData) -> AppResult<()> {
        let Some(elec_id) = session.elec_id.as_deref() else {
            return Ok(());
        };
        if let Some(voter) = &session.voter_token {
            self.presence
                .refresh_voter(elec_id, &voter.voter_id, connection_id)
                .await?;
        } else if session.view_id.is_some() {
            self.presence.refresh_viewer(elec_id, connection_id).await?;
        }
        Ok(())
    }

    async fn remove_presence(&self, connection_id: &str, session: &SessionData) -> AppResult<()> {
        let Some(elec_id) = session.elec_id.as_deref() else {
            return Ok(());
        };
        if let Some(voter) = &session.voter_token {
            self.presence
                .unmark_voter_present(elec_id, &voter.voter_id, connection_id)
                .await?;
        } else if session.view_id.is_some() {
            self.presence
                .unmark_viewer_present(elec_id, connection_id)
                .await?;
        }
        Ok(())
    }
}
