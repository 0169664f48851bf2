//! Presence index over TTL-bounded marker keys.
//!
//! There is no authoritative membership set: a connection is present in an
//! election exactly while its marker key exists. Expiry of the marker is the
//! reaper, so a crashed gateway instance cannot leak presence past the TTL.
//! The colon-delimited key encoding is private to this module.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use votelive_cache::keys;
use votelive_core::result::AppResult;
use votelive_core::traits::KvStore;

/// Marker value; only key existence matters.
const PRESENT: &str = "1";

/// Maps elections to their connected voter and viewer connections.
#[derive(Debug, Clone)]
pub struct PresenceIndex {
    /// Shared key/value store.
    kv: Arc<dyn KvStore>,
    /// Marker TTL, shared with the owning sessions.
    ttl: Duration,
}

impl PresenceIndex {
    /// Creates a presence index with the given marker TTL.
    pub fn new(kv: Arc<dyn KvStore>, ttl: Duration) -> Self {
        Self { kv, ttl }
    }

    /// Records a voter connection. Idempotent.
    pub async fn mark_voter_present(
        &self,
        elec_id: &str,
        voter_id: &str,
        connection_id: &str,
    ) -> AppResult<()> {
        let key = keys::ws_election_voter_connection(elec_id, voter_id, connection_id);
        self.kv.set(&key, PRESENT, self.ttl).await
    }

    /// Records a viewer connection. Idempotent.
    pub async fn mark_viewer_present(&self, elec_id: &str, connection_id: &str) -> AppResult<()> {
        let key = keys::ws_election_viewer_connection(elec_id, connection_id);
        self.kv.set(&key, PRESENT, self.ttl).await
    }

    /// Removes a voter connection marker. Idempotent.
    pub async fn unmark_voter_present(
        &self,
        elec_id: &str,
        voter_id: &str,
        connection_id: &str,
    ) -> AppResult<()> {
        let key = keys::ws_election_voter_connection(elec_id, voter_id, connection_id);
        self.kv.delete(&key).await
    }

    /// Removes a viewer connection marker. Idempotent.
    pub async fn unmark_viewer_present(&self, elec_id: &str, connection_id: &str) -> AppResult<()> {
        let key = keys::ws_election_viewer_connection(elec_id, connection_id);
        self.kv.delete(&key).await
    }

    /// Pushes a voter marker's expiry out to a full TTL.
    pub async fn refresh_voter(
        &self,
        elec_id: &str,
        voter_id: &str,
        connection_id: &str,
    ) -> AppResult<()> {
        let key = keys::ws_election_voter_connection(elec_id, voter_id, connection_id);
        self.kv.expire(&key, self.ttl).await?;
        Ok(())
    }

    /// Pushes a viewer marker's expiry out to a full TTL.
    pub async fn refresh_viewer(&self, elec_id: &str, connection_id: &str) -> AppResult<()> {
        let key = keys::ws_election_viewer_connection(elec_id, connection_id);
        self.kv.expire(&key, self.ttl).await?;
        Ok(())
    }

    /// Connection ids of every live voter connection in an election.
    ///
    /// Deduplicated: a voter holding several connections contributes each
    /// connection once.
    pub async fn list_voter_connections(&self, elec_id: &str) -> AppResult<Vec<String>> {
        let matched = self
            .kv
            .keys_matching(&keys::ws_election_voter_wildcard(elec_id))
            .await?;
        let unique: HashSet<String> = matched
            .iter()
            .filter_map(|key| keys::voter_key_connection(key))
            .map(str::to_string)
            .collect();
        Ok(unique.into_iter().collect())
    }

    /// Connection ids of every live viewer connection in an election.
    pub async fn list_viewer_connections(&self, elec_id: &str) -> AppResult<Vec<String>> {
        let matched = self
            .kv
            .keys_matching(&keys::ws_election_viewer_wildcard(elec_id))
            .await?;
        Ok(matched
            .iter()
            .filter_map(|key| keys::viewer_key_connection(key))
            .map(str::to_string)
            .collect())
    }

    /// Number of distinct voters currently connected to an election.
    ///
    /// Deduplicates by voter id, not by connection.
    pub async fn count_distinct_voters(&self, elec_id: &str) -> AppResult<u64> {
        let matched = self
            .kv
            .keys_matching(&keys::ws_election_voter_wildcard(elec_id))
            .await?;
        let voters: HashSet<&str> = matched
            .iter()
            .filter_map(|key| keys::voter_key_voter_id(key))
            .collect();
        Ok(voters.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use votelive_cache::memory::MemoryKvStore;

    fn index() -> PresenceIndex {
        PresenceIndex::new(Arc::new(MemoryKvStore::new()), Duration::from_secs(60))
    }

    #[tokio::test]
    async fn voter_presence_is_listed_and_removable() {
        let index = index();
        index.mark_voter_present("e1", "v1", "c1").await.unwrap();

        let connections = index.list_voter_connections("e1").await.unwrap();
        assert_eq!(connections, vec!["c1".to_string()]);

        index.unmark_voter_present("e1", "v1", "c1").await.unwrap();
        assert!(index.list_voter_connections("e1").await.unwrap().is_empty());

        // idempotent delete
        index.unmark_voter_present("e1", "v1", "c1").await.unwrap();
    }

    #[tokio::test]
    async fn distinct_voter_count_dedupes_by_voter_id() {
        let index = index();
        index.mark_voter_present("e1", "v1", "c1").await.unwrap();
        index.mark_voter_present("e1", "v1", "c2").await.unwrap();
        index.mark_voter_present("e1", "v2", "c3").await.unwrap();

        let mut connections = index.list_voter_connections("e1").await.unwrap();
        connections.sort();
        assert_eq!(connections, vec!["c1", "c2", "c3"]);
        assert_eq!(index.count_distinct_voters("e1").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn viewer_presence_is_scoped_per_election() {
        let index = index();
        index.mark_viewer_present("e1", "c1").await.unwrap();
        index.mark_viewer_present("e2", "c2").await.unwrap();

        assert_eq!(
            index.list_viewer_connections("e1").await.unwrap(),
            vec!["c1".to_string()]
        );
        assert_eq!(
            index.list_viewer_connections("e2").await.unwrap(),
            vec!["c2".to_string()]
        );
    }
}
